//! Rooted parse tree
//!
//! The interpreter grows a [`Tree`] of typed [`Node`]s as `Parse`
//! expressions succeed. A node is a *leaf* when it carries only a string
//! payload and an *edge* when child nodes were appended to it; the two are
//! mutually exclusive in the serialized form. Structural deep copy (via
//! `Clone`) is what the interpreter snapshots for backtracking.
//!
//! Serialization is compact JSON with guaranteed property order:
//! `{"T":1}` for an empty node, `{"T":1,"V":"text"}` for a leaf, and
//! `{"T":1,"N":[…]}` for an edge.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Type tag of every tree root.
pub const ROOT_TAG: u32 = 1;

/// One typed node in the parse tree.
///
/// `value` holds the substring the node's expression covered. When children
/// are present the node is an edge and the value is suppressed from
/// serialization; it remains available programmatically.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Node {
    /// Integer type tag identifying the kind of node
    pub tag: u32,
    /// Leaf payload: the text covered by the match
    pub value: String,
    /// Ordered child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty node with the given type tag.
    #[inline]
    pub fn new(tag: u32) -> Self {
        Self {
            tag,
            value: String::new(),
            children: Vec::new(),
        }
    }

    /// Create a leaf node with the given type tag and payload.
    #[inline]
    pub fn with_value(tag: u32, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Append a child, turning this node into an edge.
    #[inline]
    pub fn append(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Number of direct children.
    #[inline]
    pub fn count(&self) -> usize {
        self.children.len()
    }

    /// True when no child was ever appended.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when at least one child was appended.
    #[inline]
    pub fn is_edge(&self) -> bool {
        !self.children.is_empty()
    }

    /// Serialize to the compact JSON form.
    #[inline]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from the compact JSON form.
    #[inline]
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let edge = !self.children.is_empty();
        let leaf = !edge && !self.value.is_empty();
        let mut map = serializer.serialize_map(Some(1 + (edge || leaf) as usize))?;
        map.serialize_entry("T", &self.tag)?;
        if edge {
            map.serialize_entry("N", &self.children)?;
        } else if leaf {
            map.serialize_entry("V", &self.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a parse tree node object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
                let mut tag: Option<u32> = None;
                let mut value: Option<String> = None;
                let mut children: Option<Vec<Node>> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "T" => tag = Some(map.next_value()?),
                        "V" => value = Some(map.next_value()?),
                        "N" => children = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(Node {
                    tag: tag.ok_or_else(|| de::Error::missing_field("T"))?,
                    value: value.unwrap_or_default(),
                    children: children.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_map(NodeVisitor)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// The rooted parse tree a scanner grows into.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tree {
    /// Root sentinel node, always tag [`ROOT_TAG`]
    pub root: Node,
}

impl Tree {
    /// Create a tree with an empty root node.
    #[inline]
    pub fn new() -> Self {
        Self {
            root: Node::new(ROOT_TAG),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_node_json() {
        assert_eq!(Node::new(1).to_json().unwrap(), r#"{"T":1}"#);
    }

    #[test]
    fn test_leaf_node_json() {
        let n = Node::with_value(2, "so");
        assert_eq!(n.to_json().unwrap(), r#"{"T":2,"V":"so"}"#);
    }

    #[test]
    fn test_edge_node_json_suppresses_value() {
        let mut n = Node::with_value(2, "some");
        n.append(Node::with_value(3, "some"));
        assert_eq!(n.to_json().unwrap(), r#"{"T":2,"N":[{"T":3,"V":"some"}]}"#);
        // the value is still there for programmatic use
        assert_eq!(n.value, "some");
    }

    #[test]
    fn test_append_and_count() {
        let mut root = Node::new(ROOT_TAG);
        root.append(Node::with_value(2, "so"));
        root.append(Node::with_value(2, "me"));
        assert_eq!(root.count(), 2);
        assert!(root.is_edge());
        assert!(!root.is_leaf());
        assert_eq!(
            root.to_json().unwrap(),
            r#"{"T":1,"N":[{"T":2,"V":"so"},{"T":2,"V":"me"}]}"#
        );
    }

    #[test]
    fn test_structural_copy() {
        let mut root = Node::new(ROOT_TAG);
        root.append(Node::with_value(2, "x"));
        let copy = root.clone();
        root.append(Node::with_value(2, "y"));
        assert_eq!(copy.count(), 1);
        assert_eq!(root.count(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut n = Node::new(2);
        n.append(Node::with_value(3, "g"));
        n.append(Node::with_value(3, "o"));
        let json = n.to_json().unwrap();
        let parsed = Node::from_json(&json).unwrap();
        assert_eq!(parsed, n);
    }

    #[test]
    fn test_display_is_json() {
        let n = Node::with_value(7, "hi");
        assert_eq!(n.to_string(), r#"{"T":7,"V":"hi"}"#);
    }

    #[test]
    fn test_tree_root() {
        let t = Tree::new();
        assert_eq!(t.root.tag, ROOT_TAG);
        assert_eq!(t.root.to_json().unwrap(), r#"{"T":1}"#);
    }
}
