use crate::U256_E6;
use crate::error::Error;
use crate::math::math_helpers::{mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{
    get_amount_0_delta_base, get_amount_1_delta_base, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use alloy_primitives::{I256, U256};

/// Computes one bounded swap step between the current price and a target
/// price, within a region of constant liquidity.
///
/// `amount_remaining` follows the engine convention: non-negative means
/// exact input (fee-inclusive), negative means exact output. Returns
/// `(sqrt_ratio_next_x96, amount_in, amount_out, fee_amount)` where
/// `amount_in` excludes the fee.
///
/// With zero liquidity the step is free: the price jumps to the target
/// and all three amounts are zero.
pub fn compute_swap_step(
    sqrt_ratio_current_x96: U256,
    sqrt_ratio_target_x96: U256,
    liquidity: u128,
    amount_remaining: I256,
    fee_pips: u32,
) -> Result<(U256, U256, U256, U256), Error> {
    let zero_for_one = sqrt_ratio_current_x96 >= sqrt_ratio_target_x96;
    let exact_in = amount_remaining >= I256::ZERO;
    let fee_denominator = U256_E6 - U256::from(fee_pips);

    let sqrt_ratio_next_x96: U256;
    let mut amount_in = U256::ZERO;
    let mut amount_out = U256::ZERO;

    if exact_in {
        let amount_remaining_less_fee =
            mul_div(amount_remaining.into_raw(), fee_denominator, U256_E6)?;
        amount_in = if zero_for_one {
            get_amount_0_delta_base(
                sqrt_ratio_target_x96,
                sqrt_ratio_current_x96,
                liquidity,
                true,
            )?
        } else {
            get_amount_1_delta_base(
                sqrt_ratio_current_x96,
                sqrt_ratio_target_x96,
                liquidity,
                true,
            )?
        };
        if amount_remaining_less_fee >= amount_in {
            sqrt_ratio_next_x96 = sqrt_ratio_target_x96;
        } else {
            sqrt_ratio_next_x96 = get_next_sqrt_price_from_input(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?;
        }
    } else {
        amount_out = if zero_for_one {
            get_amount_1_delta_base(
                sqrt_ratio_target_x96,
                sqrt_ratio_current_x96,
                liquidity,
                false,
            )?
        } else {
            get_amount_0_delta_base(
                sqrt_ratio_current_x96,
                sqrt_ratio_target_x96,
                liquidity,
                false,
            )?
        };
        if amount_remaining.unsigned_abs() >= amount_out {
            sqrt_ratio_next_x96 = sqrt_ratio_target_x96;
        } else {
            sqrt_ratio_next_x96 = get_next_sqrt_price_from_output(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining.unsigned_abs(),
                zero_for_one,
            )?;
        }
    }

    let max = sqrt_ratio_target_x96 == sqrt_ratio_next_x96;

    if zero_for_one {
        if !(max && exact_in) {
            amount_in = get_amount_0_delta_base(
                sqrt_ratio_next_x96,
                sqrt_ratio_current_x96,
                liquidity,
                true,
            )?;
        }
        if !(max && !exact_in) {
            amount_out = get_amount_1_delta_base(
                sqrt_ratio_next_x96,
                sqrt_ratio_current_x96,
                liquidity,
                false,
            )?;
        }
    } else {
        if !(max && exact_in) {
            amount_in = get_amount_1_delta_base(
                sqrt_ratio_current_x96,
                sqrt_ratio_next_x96,
                liquidity,
                true,
            )?;
        }
        if !(max && !exact_in) {
            amount_out = get_amount_0_delta_base(
                sqrt_ratio_current_x96,
                sqrt_ratio_next_x96,
                liquidity,
                false,
            )?;
        }
    }

    // rounding can overshoot the requested output by one unit
    if !exact_in && amount_out > amount_remaining.unsigned_abs() {
        amount_out = amount_remaining.unsigned_abs();
    }

    let fee_amount = if exact_in && sqrt_ratio_next_x96 != sqrt_ratio_target_x96 {
        // the step consumed the whole remaining input, the leftover is the fee
        amount_remaining.into_raw() - amount_in
    } else {
        mul_div_rounding_up(amount_in, U256::from(fee_pips), fee_denominator)?
    };

    Ok((sqrt_ratio_next_x96, amount_in, amount_out, fee_amount))
}
