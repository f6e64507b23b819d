//! Basic benchmarks for the `segment_chain` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::sync::Arc;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use segment_chain::SegmentChain;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

const SEGMENT_LEN: usize = 256;
const CHAIN_SEGMENTS: usize = 16;

fn segment_buffer() -> Box<[u8]> {
    vec![0_u8; SEGMENT_LEN].into_boxed_slice()
}

fn build_chain(segments: usize) -> Arc<SegmentChain<u8>> {
    let mut chain = None;

    for _ in 0..segments {
        chain = Some(
            SegmentChain::freeze(segment_buffer(), SEGMENT_LEN, chain)
                .expect("benchmark segments are well formed"),
        );
    }

    chain.expect("at least one segment was frozen")
}

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("chain_basic");

    let allocs_op = allocs.operation("freeze_first");
    group.bench_function("freeze_first", |b| {
        b.iter_custom(|iters| {
            let mut buffers = iter::repeat_with(segment_buffer)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for buffer in buffers.drain(..) {
                let node = SegmentChain::freeze(black_box(buffer), SEGMENT_LEN, None);
                drop(black_box(node));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("freeze_onto_chain");
    group.bench_function("freeze_onto_chain", |b| {
        b.iter_custom(|iters| {
            let head = build_chain(CHAIN_SEGMENTS);
            let mut buffers = iter::repeat_with(segment_buffer)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for buffer in buffers.drain(..) {
                let node = SegmentChain::freeze(
                    black_box(buffer),
                    SEGMENT_LEN,
                    Some(Arc::clone(&head)),
                );
                drop(black_box(node));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("materialize");
    group.bench_function("materialize", |b| {
        b.iter_custom(|iters| {
            let chain = build_chain(CHAIN_SEGMENTS);
            let live = [1_u8; 64];

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(chain.materialize(black_box(&live))));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("segments_walk");
    group.bench_function("segments_walk", |b| {
        b.iter_custom(|iters| {
            let chain = build_chain(CHAIN_SEGMENTS);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let total: usize = chain.segments().map(<[u8]>::len).sum();
                _ = black_box(total);
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
