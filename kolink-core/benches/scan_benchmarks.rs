//! Scan throughput against dictionaries of increasing size

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kolink_core::{build, Automaton};
use std::hint::black_box;

const SYLLABLES: &[char] = &[
    '가', '나', '다', '라', '마', '바', '사', '아', '자', '차', '카', '타', '파', '하', '국', '한',
    '시', '어', '요', '김',
];

/// Deterministic pseudo-random syllable strings
fn generate_patterns(count: usize) -> Vec<(String, String)> {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..count)
        .map(|index| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let len = 1 + (seed % 5) as usize;
            let expression: String = (0..len)
                .map(|offset| SYLLABLES[((seed >> (offset * 5)) % SYLLABLES.len() as u64) as usize])
                .collect();
            (format!("entry-{index}"), expression)
        })
        .collect()
}

fn generate_text(sentences: usize) -> String {
    let samples = [
        "안녕하세요! 한국어를 공부하고 있어요.",
        "아시아에 가다. 김치는 맛있어요.",
        "사과와 바나나를 샀어요 (3개).",
        "하늘이 파랗고 바다가 넓어요.",
    ];
    samples
        .iter()
        .cycle()
        .take(sentences)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_automaton(count: usize) -> Automaton {
    let patterns = generate_patterns(count);
    build(patterns.iter().map(|(id, expr)| (id.clone(), expr.as_str()))).unwrap()
}

fn benchmark_dictionary_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary_size");
    let text = generate_text(200);
    group.throughput(Throughput::Bytes(text.len() as u64));

    for count in [10, 1_000, 16_000] {
        let automaton = build_automaton(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| automaton.scan(black_box(text), None));
        });
    }

    group.finish();
}

fn benchmark_text_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_length");
    let automaton = build_automaton(16_000);

    for sentences in [1, 100, 10_000] {
        let text = generate_text(sentences);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sentences), &text, |b, text| {
            b.iter(|| automaton.scan(black_box(text), Some("entry-0")));
        });
    }

    group.finish();
}

fn benchmark_build_and_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    let patterns = generate_patterns(16_000);
    let automaton = build_automaton(16_000);
    let json = automaton.to_json().unwrap();
    let binary = automaton.to_binary().unwrap();

    group.bench_function("build", |b| {
        b.iter(|| build(black_box(&patterns).iter().map(|(id, expr)| (id.clone(), expr.as_str()))))
    });
    group.bench_function("decode_json", |b| {
        b.iter(|| Automaton::from_json(black_box(&json)))
    });
    group.bench_function("decode_binary", |b| {
        b.iter(|| Automaton::from_binary(black_box(&binary)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_dictionary_size,
    benchmark_text_length,
    benchmark_build_and_decode
);
criterion_main!(benches);
