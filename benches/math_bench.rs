use criterion::{criterion_group, criterion_main};

mod common;

criterion_group!(
    math_benches,
    common::bench_tick_math,
    common::bench_math_helpers,
    common::bench_swap_math,
    common::bench_pool_swap,
);
criterion_main!(math_benches);
