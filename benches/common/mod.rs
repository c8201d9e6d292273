use clmm_pool::math::math_helpers::{mul_div, mul_div_rounding_up};
use clmm_pool::math::swap_math::compute_swap_step;
use clmm_pool::math::tick_math::{
    MIN_SQRT_RATIO, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio,
};
use clmm_pool::pool::swap::SwapParams;
use clmm_pool::{Address, I256, Pool, Q96, U256};
use criterion::Criterion;
use std::hint::black_box;

const ONE_E18: u128 = 1_000_000_000_000_000_000;

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");

    group.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| {
            for tick in [-887272, -123456, -60, 0, 60, 123456, 887272] {
                let _ = black_box(get_sqrt_ratio_at_tick(black_box(tick)));
            }
        })
    });

    let ratios: Vec<U256> = [-887272, -123456, -60, 0, 60, 123456, 887271]
        .iter()
        .map(|&t| get_sqrt_ratio_at_tick(t).unwrap())
        .collect();

    group.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| {
            for ratio in &ratios {
                let _ = black_box(get_tick_at_sqrt_ratio(black_box(*ratio)));
            }
        })
    });

    group.finish();
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("math_helpers");

    let a = U256::from(ONE_E18) * U256::from(987_654_321u64);
    let b_val = Q96 * U256::from(3u8);
    let denominator = Q96 + U256::from(1u8);

    group.bench_function("mul_div", |b| {
        b.iter(|| mul_div(black_box(a), black_box(b_val), black_box(denominator)))
    });

    group.bench_function("mul_div_rounding_up", |b| {
        b.iter(|| mul_div_rounding_up(black_box(a), black_box(b_val), black_box(denominator)))
    });

    group.finish();
}

pub fn bench_swap_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_math");

    let current = get_sqrt_ratio_at_tick(0).unwrap();
    let target = get_sqrt_ratio_at_tick(-60).unwrap();
    let liquidity = 2 * ONE_E18;

    group.bench_function("compute_swap_step_exact_in", |b| {
        b.iter(|| {
            compute_swap_step(
                black_box(current),
                black_box(target),
                black_box(liquidity),
                black_box(I256::from_raw(U256::from(ONE_E18 / 100))),
                black_box(3000),
            )
        })
    });

    group.bench_function("compute_swap_step_exact_out", |b| {
        b.iter(|| {
            compute_swap_step(
                black_box(current),
                black_box(target),
                black_box(liquidity),
                black_box(-I256::from_raw(U256::from(ONE_E18 / 100))),
                black_box(3000),
            )
        })
    });

    group.finish();
}

pub fn bench_pool_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_swap");

    // full-range liquidity plus a ladder of narrow positions so swaps
    // cross several initialized ticks
    let build_pool = || {
        let mut pool = Pool::new(3000, 60, Q96).unwrap();
        let owner = Address::ZERO;
        pool.mint(owner, -887_220, 887_220, 10 * ONE_E18).unwrap();
        for i in 1..=8 {
            pool.mint(owner, -600 * i, 600 * i, ONE_E18).unwrap();
        }
        pool
    };
    let pool = build_pool();

    group.bench_function("swap_exact_in_multi_cross", |b| {
        b.iter_batched(
            || pool.clone(),
            |mut pool| {
                pool.swap(black_box(SwapParams::new(
                    true,
                    I256::from_raw(U256::from(3 * ONE_E18)),
                    MIN_SQRT_RATIO,
                )))
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("mint_burn_cycle", |b| {
        b.iter_batched(
            || pool.clone(),
            |mut pool| {
                let owner = Address::ZERO;
                pool.mint(owner, -1200, 1200, ONE_E18).unwrap();
                pool.burn(owner, -1200, 1200, ONE_E18).unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}
