use crate::Q128;
use crate::error::{Error, PoolError};
use crate::math::liquidity_math::add_delta;
use crate::math::math_helpers::mul_div;
use alloy_primitives::{Address, U256};

/// Identity of a position: one ledger entry exists per owner and tick
/// range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Per-position liquidity and fee bookkeeping.
///
/// `fee_growth_inside_*_last` snapshot the in-range accumulators at the
/// last touch; `tokens_owed_*` hold fees accrued since, plus principal
/// credited by burns, until collected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionInfo {
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x128: U256,
    pub fee_growth_inside_1_last_x128: U256,
    pub tokens_owed_0: U256,
    pub tokens_owed_1: U256,
}

impl PositionInfo {
    /// Settles fees accrued since the last touch and applies a liquidity
    /// delta.
    ///
    /// A zero-delta touch of an empty position is rejected, everything
    /// else accrues `floor(growth * liquidity / 2^128)` per token first
    /// and then moves the liquidity.
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside_0_x128: U256,
        fee_growth_inside_1_x128: U256,
    ) -> Result<(), Error> {
        let liquidity_next = if liquidity_delta == 0 {
            if self.liquidity == 0 {
                return Err(PoolError::ZeroLiquidity.into());
            }
            self.liquidity
        } else {
            add_delta(self.liquidity, liquidity_delta)?
        };

        let tokens_owed_0 = mul_div(
            fee_growth_inside_0_x128.wrapping_sub(self.fee_growth_inside_0_last_x128),
            U256::from(self.liquidity),
            Q128,
        )?;
        let tokens_owed_1 = mul_div(
            fee_growth_inside_1_x128.wrapping_sub(self.fee_growth_inside_1_last_x128),
            U256::from(self.liquidity),
            Q128,
        )?;

        self.liquidity = liquidity_next;
        self.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128;
        self.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128;
        self.tokens_owed_0 = self.tokens_owed_0.wrapping_add(tokens_owed_0);
        self.tokens_owed_1 = self.tokens_owed_1.wrapping_add(tokens_owed_1);

        Ok(())
    }
}
