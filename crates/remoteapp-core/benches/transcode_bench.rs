//! Criterion benchmarks for the action-payload transcoding.
//!
//! The transcode sits on the hot path of every server-initiated action
//! event, so encode/decode latency is worth tracking even though payloads
//! are typically small.
//!
//! Run with:
//! ```bash
//! cargo bench --package remoteapp-core --bench transcode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use remoteapp_core::transcode::{decode_binary, encode_binary};

// ── Payload fixtures ──────────────────────────────────────────────────────────

/// ASCII text payload of the given size, the common case for action data.
fn make_text_payload(size: usize) -> Vec<u8> {
    b"remote action payload "
        .iter()
        .cycle()
        .take(size)
        .copied()
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_binary");
    for size in [32usize, 1024, 65536] {
        let payload = make_text_payload(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| encode_binary(black_box(Some(payload))).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_binary");
    for size in [32usize, 1024, 65536] {
        let encoded = encode_binary(Some(&make_text_payload(size)))
            .unwrap()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| decode_binary(black_box(Some(encoded))).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
