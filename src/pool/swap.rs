use crate::error::{Error, PoolError, StateError};
use crate::math::liquidity_math::add_delta;
use crate::math::math_helpers::{mul_div, unlikely};
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_bitmap::next_initialized_tick_within_one_word;
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
};
use crate::pool::state::Pool;
use crate::{Q128, U256_1, U256_E4};
use alloy_primitives::{I256, U256};
use std::ops::{Add, Sub};

/// Derives a sqrt-price limit from a slippage tolerance, for callers
/// that think in tolerances rather than raw Q96 prices.
pub fn calculate_sqrt_price_limit(
    sqrt_price_x96: U256,
    zero_for_one: bool,
    tolerance: f32, // as a fraction, 0.005 = 0.5%
) -> U256 {
    // a tolerance past 100% would drive the downward factor negative
    let slippage_bps = tolerance.clamp(0.0, 1.0) * 10_000.0;

    if zero_for_one {
        (sqrt_price_x96 * U256::from(10000.0 - slippage_bps)) / U256_E4
    } else {
        (sqrt_price_x96 * U256::from(10000.0 + slippage_bps)) / U256_E4
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SwapParams {
    /// Swap direction: `true` for token0 in, token1 out.
    pub zero_for_one: bool,
    /// Signed amount being swapped. Positive means exact in, negative means exact out.
    pub amount_specified: I256,
    /// Q96 sqrt-price the swap is not allowed to move past.
    ///
    /// Use [`calculate_sqrt_price_limit`] to derive this from a percentage tolerance.
    pub sqrt_price_limit_x96: U256,
}

impl SwapParams {
    #[inline]
    pub fn new(zero_for_one: bool, amount_specified: I256, sqrt_price_limit_x96: U256) -> Self {
        Self {
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
        }
    }
}

/// Token deltas of a completed swap, signed from the pool's point of
/// view: positive amounts flow into the pool, negative amounts out.
#[derive(Copy, Clone, Debug)]
pub struct SwapResult {
    pub amount0: I256,
    pub amount1: I256,
    /// Total fees charged on the input token, protocol share included.
    pub fees_paid: U256,
}

// the top level state of the swap, committed to the pool only when the
// whole loop has succeeded
struct SwapState {
    // the amount remaining to be swapped in/out of the input/output asset
    amount_specified_remaining: I256,
    // the amount already swapped out/in of the output/input asset
    amount_calculated: I256,
    // current sqrt(price)
    sqrt_price_x96: U256,
    // the tick associated with the current price
    tick: i32,
    // the current liquidity in range
    liquidity: u128,
    // input-token fee growth accumulator, global value plus this swap
    fee_growth_global_x128: U256,
    // fees skimmed for the protocol so far
    protocol_fee: U256,
    // total fees charged so far
    swap_fee: U256,
}

#[derive(Default)]
struct StepComputations {
    // the price at the beginning of the step
    sqrt_price_start_x96: U256,
    // the next tick to swap to from the current tick in the swap direction
    tick_next: i32,
    // whether tick_next is initialized or not
    initialized: bool,
    // sqrt(price) for the next tick (1/0)
    sqrt_price_next_x96: U256,
    // how much is being swapped in in this step
    amount_in: U256,
    // how much is being swapped out
    amount_out: U256,
    // how much fee is being paid in
    fee_amount: U256,
}

// journal entry for a crossed tick: the crossing is replayed against
// storage only at commit time
struct TickCrossing {
    tick: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
}

impl Pool {
    /// Executes a swap against the pool, stepping the price tick range by
    /// tick range until the specified amount is satisfied or the price
    /// limit is reached.
    ///
    /// State is mutated only on success; any error leaves the pool
    /// exactly as it was. A limit equal to the current price is a legal
    /// no-op.
    pub fn swap(&mut self, params: SwapParams) -> Result<SwapResult, Error> {
        let amount_specified = params.amount_specified;
        if unlikely(amount_specified.is_zero()) {
            return Err(PoolError::ZeroAmount.into());
        }

        let zero_for_one = params.zero_for_one;
        let sqrt_price_limit_x96 = params.sqrt_price_limit_x96;
        if zero_for_one {
            if unlikely(sqrt_price_limit_x96 < MIN_SQRT_RATIO) {
                return Err(StateError::PriceOutOfBounds.into());
            }
            if unlikely(sqrt_price_limit_x96 > self.slot0.sqrt_price_x96) {
                return Err(PoolError::PriceLimitAlreadyReached.into());
            }
        } else {
            if unlikely(sqrt_price_limit_x96 >= MAX_SQRT_RATIO) {
                return Err(StateError::PriceOutOfBounds.into());
            }
            if unlikely(sqrt_price_limit_x96 < self.slot0.sqrt_price_x96) {
                return Err(PoolError::PriceLimitAlreadyReached.into());
            }
        }

        let exact_input: bool = amount_specified.is_positive();

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            amount_calculated: I256::ZERO,
            sqrt_price_x96: self.slot0.sqrt_price_x96,
            tick: self.slot0.tick,
            liquidity: self.liquidity,
            fee_growth_global_x128: if zero_for_one {
                self.fee_growth_global_0_x128
            } else {
                self.fee_growth_global_1_x128
            },
            protocol_fee: U256::ZERO,
            swap_fee: U256::ZERO,
        };
        let mut crossings: Vec<TickCrossing> = Vec::new();

        while (state.amount_specified_remaining != I256::ZERO)
            && (state.sqrt_price_x96 != sqrt_price_limit_x96)
        {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                ..StepComputations::default()
            };

            (step.tick_next, step.initialized) = next_initialized_tick_within_one_word(
                &self.bitmap,
                state.tick,
                self.tick_spacing,
                zero_for_one,
            )?;

            // the extreme ticks bound the search as permanent sentinels
            step.tick_next = step.tick_next.clamp(MIN_TICK, MAX_TICK);

            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            (
                state.sqrt_price_x96,
                step.amount_in,
                step.amount_out,
                step.fee_amount,
            ) = compute_swap_step(
                state.sqrt_price_x96,
                if zero_for_one {
                    if step.sqrt_price_next_x96 < sqrt_price_limit_x96 {
                        sqrt_price_limit_x96
                    } else {
                        step.sqrt_price_next_x96
                    }
                } else if step.sqrt_price_next_x96 > sqrt_price_limit_x96 {
                    sqrt_price_limit_x96
                } else {
                    step.sqrt_price_next_x96
                },
                state.liquidity,
                state.amount_specified_remaining,
                self.fee_pips,
            )?;

            state.swap_fee += step.fee_amount;

            if exact_input {
                state.amount_specified_remaining -=
                    I256::from_raw(step.amount_in + step.fee_amount);
                state.amount_calculated =
                    state.amount_calculated.sub(I256::from_raw(step.amount_out));
            } else {
                state.amount_specified_remaining += I256::from_raw(step.amount_out);
                state.amount_calculated = state
                    .amount_calculated
                    .add(I256::from_raw(step.amount_in + step.fee_amount));
            }

            let mut step_fee = step.fee_amount;
            if self.fee_protocol > 0 {
                let delta = step_fee / U256::from(self.fee_protocol);
                step_fee -= delta;
                state.protocol_fee += delta;
            }

            if state.liquidity > 0 {
                state.fee_growth_global_x128 = state
                    .fee_growth_global_x128
                    .wrapping_add(mul_div(step_fee, Q128, U256::from(state.liquidity))?);
            }

            if state.sqrt_price_x96 == step.sqrt_price_next_x96 {
                if step.initialized {
                    let mut liquidity_net = self
                        .get_liquidity_net(&step.tick_next)
                        .ok_or(StateError::InvalidTick)?;

                    crossings.push(TickCrossing {
                        tick: step.tick_next,
                        fee_growth_global_0_x128: if zero_for_one {
                            state.fee_growth_global_x128
                        } else {
                            self.fee_growth_global_0_x128
                        },
                        fee_growth_global_1_x128: if zero_for_one {
                            self.fee_growth_global_1_x128
                        } else {
                            state.fee_growth_global_x128
                        },
                    });

                    if zero_for_one {
                        liquidity_net = -liquidity_net;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                }
                // a downward crossing leaves the price on the boundary,
                // so the tick steps below it, but never past MIN_TICK
                state.tick = if zero_for_one {
                    (step.tick_next - 1).max(MIN_TICK)
                } else {
                    step.tick_next
                };
            } else if state.sqrt_price_x96 != step.sqrt_price_start_x96 {
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        // an exact-output order that drained the price to the edge of the
        // representable range cannot be satisfied
        if !exact_input && state.amount_specified_remaining != I256::ZERO {
            let drained = if zero_for_one {
                state.sqrt_price_x96 == MIN_SQRT_RATIO
            } else {
                state.sqrt_price_x96 == MAX_SQRT_RATIO - U256_1
            };
            if drained {
                return Err(PoolError::InsufficientLiquidity.into());
            }
        }

        // commit
        self.slot0.sqrt_price_x96 = state.sqrt_price_x96;
        self.slot0.tick = state.tick;
        self.liquidity = state.liquidity;
        if zero_for_one {
            self.fee_growth_global_0_x128 = state.fee_growth_global_x128;
            self.protocol_fees.token0 += state.protocol_fee;
        } else {
            self.fee_growth_global_1_x128 = state.fee_growth_global_x128;
            self.protocol_fees.token1 += state.protocol_fee;
        }
        for crossing in crossings {
            // every journaled tick was read from the map during the loop
            debug_assert!(self.ticks.contains_key(&crossing.tick));
            if let Some(info) = self.ticks.get_mut(&crossing.tick) {
                info.cross(
                    crossing.fee_growth_global_0_x128,
                    crossing.fee_growth_global_1_x128,
                );
            }
        }

        let (amount0, amount1): (I256, I256) = if zero_for_one == exact_input {
            (
                amount_specified - state.amount_specified_remaining,
                state.amount_calculated,
            )
        } else {
            (
                state.amount_calculated,
                amount_specified - state.amount_specified_remaining,
            )
        };

        Ok(SwapResult {
            amount0,
            amount1,
            fees_paid: state.swap_fee,
        })
    }
}
