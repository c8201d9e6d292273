use crate::error::MathError;
use crate::math::liquidity_math::add_delta;
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use alloy_primitives::U256;

/// Accounting state of one initialized tick.
///
/// `fee_growth_outside` is relative: it tracks fee growth on the far side
/// of the tick from the current price, and flips meaning every time the
/// tick is crossed. Only differences of these values are meaningful.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickInfo {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub fee_growth_outside_0_x128: U256,
    pub fee_growth_outside_1_x128: U256,
}

impl TickInfo {
    /// Applies a liquidity delta to this tick as the lower (`upper ==
    /// false`) or upper bound of a position.
    ///
    /// Returns whether the tick flipped between initialized and
    /// uninitialized. A tick initialized at or below the current tick
    /// attributes all growth so far to the region below it.
    pub fn update(
        &mut self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<bool, MathError> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

        if liquidity_gross_after > max_liquidity {
            return Err(MathError::Overflow);
        }

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        if liquidity_gross_before == 0 && tick <= tick_current {
            self.fee_growth_outside_0_x128 = fee_growth_global_0_x128;
            self.fee_growth_outside_1_x128 = fee_growth_global_1_x128;
        }

        self.liquidity_gross = liquidity_gross_after;

        // lower ticks add liquidity when entered from below, upper ticks
        // remove it
        self.liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(MathError::Overflow)?;

        Ok(flipped)
    }

    /// Transitions this tick as the price crosses it, flipping the
    /// `outside` accumulators to the other side of the tick.
    ///
    /// Returns the net liquidity delta the caller applies to the active
    /// liquidity (negated for downward crossings).
    pub fn cross(
        &mut self,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> i128 {
        self.fee_growth_outside_0_x128 =
            fee_growth_global_0_x128.wrapping_sub(self.fee_growth_outside_0_x128);
        self.fee_growth_outside_1_x128 =
            fee_growth_global_1_x128.wrapping_sub(self.fee_growth_outside_1_x128);
        self.liquidity_net
    }

    pub fn is_clear(&self) -> bool {
        self.liquidity_gross == 0
    }
}

/// Fee growth accumulated inside `[tick_lower, tick_upper)` per unit of
/// liquidity, in X128 fixed point.
///
/// Computed from the current `outside` values only; intermediate
/// wrap-arounds cancel in the subtraction.
pub fn get_fee_growth_inside(
    lower: &TickInfo,
    upper: &TickInfo,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let (fee_growth_below_0, fee_growth_below_1) = if tick_current >= tick_lower {
        (lower.fee_growth_outside_0_x128, lower.fee_growth_outside_1_x128)
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(lower.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(lower.fee_growth_outside_1_x128),
        )
    };

    let (fee_growth_above_0, fee_growth_above_1) = if tick_current < tick_upper {
        (upper.fee_growth_outside_0_x128, upper.fee_growth_outside_1_x128)
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(upper.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(upper.fee_growth_outside_1_x128),
        )
    };

    (
        fee_growth_global_0_x128
            .wrapping_sub(fee_growth_below_0)
            .wrapping_sub(fee_growth_above_0),
        fee_growth_global_1_x128
            .wrapping_sub(fee_growth_below_1)
            .wrapping_sub(fee_growth_above_1),
    )
}

/// Per-tick liquidity cap for a given tick spacing, chosen so that the
/// sum over every usable tick cannot overflow `u128`.
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}
