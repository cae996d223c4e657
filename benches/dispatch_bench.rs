// In benches/dispatch_bench.rs

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bolima::config::DispatchOptions;
use bolima::frame_pipeline::{process_frame, DispatchStrategy, IdFrameStrategy, Vocabulary};
use bolima::types::StopwordSet;

// --- Mock Data Generation ---

const WORDS: [(&str, &str, &str); 8] = [
    ("Och", "och", "KN"),
    ("poeten", "poet", "NN"),
    ("skrev", "skriva", "VB"),
    ("en", "en", "DT"),
    ("ny", "ny", "JJ"),
    ("dikt", "dikt", "NN"),
    ("i", "i", "PP"),
    (".", ".", "MAD"),
];

/// A tagged frame of `rows` tokens spread over pages of 400 tokens.
fn generate_tagged_frame(rows: usize) -> RecordBatch {
    let pick = |i: usize| WORDS[i % WORDS.len()];
    let tokens: Vec<String> = (0..rows).map(|i| format!("{}{}", pick(i).0, i % 997)).collect();
    let lemmas: Vec<String> = (0..rows).map(|i| format!("{}{}", pick(i).1, i % 997)).collect();
    let pos: Vec<&str> = (0..rows).map(|i| pick(i).2).collect();
    let ids: Vec<i64> = (0..rows).map(|i| (i / 400) as i64).collect();

    RecordBatch::try_from_iter(vec![
        ("token", Arc::new(StringArray::from(tokens)) as ArrayRef),
        ("lemma", Arc::new(StringArray::from(lemmas)) as ArrayRef),
        ("pos", Arc::new(StringArray::from(pos)) as ArrayRef),
        ("document_id", Arc::new(Int64Array::from(ids)) as ArrayRef),
    ])
    .unwrap()
}

// --- Benchmark Suite ---

const BENCH_ROWS: usize = 50_000;

fn bench_dispatch(c: &mut Criterion) {
    let frame = generate_tagged_frame(BENCH_ROWS);
    let stopwords = StopwordSet::new();
    let plain = DispatchOptions {
        drop_token_text: false,
        ..DispatchOptions::default()
    };
    let filtered = DispatchOptions {
        drop_stopword_rows: true,
        ..plain.clone()
    };

    let mut group = c.benchmark_group("Frame Dispatch");
    group.throughput(criterion::Throughput::Elements(BENCH_ROWS as u64));

    group.bench_function("Process [1] Punctuation Filter", |b| {
        b.iter(|| black_box(process_frame(black_box(&frame), &plain, &stopwords).unwrap()))
    });
    group.bench_function("Process [2] Stopword + Punctuation Filter", |b| {
        b.iter(|| black_box(process_frame(black_box(&frame), &filtered, &stopwords).unwrap()))
    });

    let processed = process_frame(&frame, &plain, &stopwords).unwrap();
    group.bench_function("Codify [1] Fresh Vocabulary", |b| {
        b.iter(|| {
            let mut strategy = IdFrameStrategy::default();
            black_box(strategy.process(processed.clone()).unwrap())
        })
    });
    group.bench_function("Codify [2] Warm Vocabulary", |b| {
        let mut strategy = IdFrameStrategy::default();
        strategy.process(processed.clone()).unwrap();
        b.iter(|| black_box(strategy.process(processed.clone()).unwrap()))
    });

    group.bench_function("Vocabulary Intern", |b| {
        let words: Vec<String> = (0..BENCH_ROWS).map(|i| format!("w{}", i % 5_000)).collect();
        b.iter(|| {
            let mut vocab = Vocabulary::new();
            for word in &words {
                black_box(vocab.intern(word));
            }
            vocab.len()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
