//! Benchmarks for raw scanning and interpreted matching
//!
//! Run with: cargo bench --bench interp

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use runescan::prelude::*;

fn sample_text(words: usize) -> String {
    let mut out = String::new();
    for i in 0..words {
        if i > 0 {
            out.push(if i % 8 == 0 { '\n' } else { ' ' });
        }
        out.push_str(["lorem", "ipsum", "dolor", "sit", "amet"][i % 5]);
    }
    out
}

fn bench_raw_scan(c: &mut Criterion) {
    let text = sample_text(1000);
    c.bench_function("raw_scan_5k_words", |b| {
        b.iter(|| {
            let mut s = Scanner::new(black_box(text.as_str())).unwrap();
            let mut n = 1usize;
            while s.scan() {
                n += 1;
            }
            n
        })
    });
}

fn bench_word_grammar(c: &mut Criterion) {
    let text = sample_text(200);
    let word = node(2, min1(range('a', 'z')));
    let sep = min1(one_of([' '.into(), '\n'.into()]));
    let phrase = seq([word.clone(), min0(seq([sep, word])), eod()]);

    c.bench_function("word_grammar_200_words", |b| {
        b.iter(|| {
            let mut s = Scanner::new(black_box(text.as_str())).unwrap();
            assert!(s.x(&[phrase.clone()]));
            s.into_tree().root.count()
        })
    });
}

fn bench_bounded_search(c: &mut Criterion) {
    let mut text = sample_text(500);
    text.push('!');
    c.bench_function("ti_search_500_words", |b| {
        b.iter(|| {
            let mut s = Scanner::new(black_box(text.as_str())).unwrap();
            assert!(s.x(&[ti('!'.into())]));
            s.cur().pos.buf_rune
        })
    });
}

criterion_group!(
    benches,
    bench_raw_scan,
    bench_word_grammar,
    bench_bounded_search
);
criterion_main!(benches);
