use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hashgate_common::frame::{ResultFrame, WorkFrame};
use hashgate_common::mask::difficulty_mask;
use hashgate_common::PREHASH_LEN;

fn bench_work_encode(c: &mut Criterion) {
    let prehash = "a".repeat(PREHASH_LEN);
    let frame = WorkFrame::new(0xFF00_0000, 1_000_000, &prehash).unwrap();

    c.bench_function("work_encode", |b| {
        b.iter(|| black_box(frame.encode()));
    });
}

fn bench_result_decode(c: &mut Criterion) {
    let prehash = "a".repeat(PREHASH_LEN);
    let bytes = ResultFrame::new(&prehash, 2024).unwrap().encode();

    c.bench_function("result_decode", |b| {
        b.iter(|| black_box(ResultFrame::decode(&bytes).unwrap()));
    });
}

fn bench_work_round_trip(c: &mut Criterion) {
    let prehash = "f".repeat(PREHASH_LEN);

    c.bench_function("work_round_trip", |b| {
        b.iter(|| {
            let frame = WorkFrame::new(0xFFFF_0000, 42, &prehash).unwrap();
            let bytes = frame.encode();
            black_box(WorkFrame::decode(&bytes).unwrap())
        });
    });
}

fn bench_difficulty_mask(c: &mut Criterion) {
    c.bench_function("difficulty_mask", |b| {
        b.iter(|| black_box(difficulty_mask(black_box(6)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_work_encode,
    bench_result_decode,
    bench_work_round_trip,
    bench_difficulty_mask,
);
criterion_main!(benches);
