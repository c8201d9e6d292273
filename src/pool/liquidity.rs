use crate::error::{Error, MathError, PoolError, StateError};
use crate::math::liquidity_math::add_delta;
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use crate::math::tick_bitmap::flip_tick;
use crate::math::tick_math::{MAX_TICK, MIN_TICK, get_sqrt_ratio_at_tick};
use crate::pool::position::PositionKey;
use crate::pool::state::Pool;
use crate::pool::tick::get_fee_growth_inside;
use alloy_primitives::{Address, I256, U256};

impl Pool {
    fn check_ticks(&self, tick_lower: i32, tick_upper: i32) -> Result<(), Error> {
        if tick_lower >= tick_upper {
            return Err(PoolError::InvalidRange.into());
        }
        if tick_lower < MIN_TICK || tick_upper > MAX_TICK {
            return Err(StateError::InvalidTick.into());
        }
        if tick_lower % self.tick_spacing != 0 || tick_upper % self.tick_spacing != 0 {
            return Err(StateError::InvalidTickSpacing.into());
        }
        Ok(())
    }

    /// Applies a signed liquidity delta to a position and its bounding
    /// ticks, returning the signed token deltas from the pool's point of
    /// view.
    ///
    /// All mutations are computed on staged copies and written back only
    /// once every fallible step has succeeded, so an error leaves the
    /// pool untouched.
    fn modify_position(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> Result<(I256, I256), Error> {
        self.check_ticks(tick_lower, tick_upper)?;

        let tick_current = self.slot0.tick;
        let fee_growth_global_0_x128 = self.fee_growth_global_0_x128;
        let fee_growth_global_1_x128 = self.fee_growth_global_1_x128;

        // staged copies of everything the operation may change
        let mut lower_info = self.ticks.get(&tick_lower).cloned().unwrap_or_default();
        let mut upper_info = self.ticks.get(&tick_upper).cloned().unwrap_or_default();

        let mut flipped_lower = false;
        let mut flipped_upper = false;
        if liquidity_delta != 0 {
            flipped_lower = lower_info.update(
                tick_lower,
                tick_current,
                liquidity_delta,
                fee_growth_global_0_x128,
                fee_growth_global_1_x128,
                false,
                self.max_liquidity_per_tick,
            )?;
            flipped_upper = upper_info.update(
                tick_upper,
                tick_current,
                liquidity_delta,
                fee_growth_global_0_x128,
                fee_growth_global_1_x128,
                true,
                self.max_liquidity_per_tick,
            )?;
        }

        let (fee_growth_inside_0, fee_growth_inside_1) = get_fee_growth_inside(
            &lower_info,
            &upper_info,
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
        );

        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        let mut position = self.positions.get(&key).cloned().unwrap_or_default();
        position.update(liquidity_delta, fee_growth_inside_0, fee_growth_inside_1)?;

        let mut amount0 = I256::ZERO;
        let mut amount1 = I256::ZERO;
        let mut liquidity_next = self.liquidity;

        if liquidity_delta != 0 {
            if tick_current < tick_lower {
                // range entirely above the price: held in token0 only
                amount0 = get_amount_0_delta(
                    get_sqrt_ratio_at_tick(tick_lower)?,
                    get_sqrt_ratio_at_tick(tick_upper)?,
                    liquidity_delta,
                )?;
            } else if tick_current < tick_upper {
                amount0 = get_amount_0_delta(
                    self.slot0.sqrt_price_x96,
                    get_sqrt_ratio_at_tick(tick_upper)?,
                    liquidity_delta,
                )?;
                amount1 = get_amount_1_delta(
                    get_sqrt_ratio_at_tick(tick_lower)?,
                    self.slot0.sqrt_price_x96,
                    liquidity_delta,
                )?;
                liquidity_next = add_delta(self.liquidity, liquidity_delta)?;
            } else {
                // range entirely below the price: held in token1 only
                amount1 = get_amount_1_delta(
                    get_sqrt_ratio_at_tick(tick_lower)?,
                    get_sqrt_ratio_at_tick(tick_upper)?,
                    liquidity_delta,
                )?;
            }
        }

        // commit
        if liquidity_delta != 0 {
            if flipped_lower {
                flip_tick(&mut self.bitmap, tick_lower, self.tick_spacing)?;
            }
            if flipped_upper {
                flip_tick(&mut self.bitmap, tick_upper, self.tick_spacing)?;
            }

            if liquidity_delta < 0 && flipped_lower {
                self.ticks.remove(&tick_lower);
            } else {
                self.ticks.insert(tick_lower, lower_info);
            }
            if liquidity_delta < 0 && flipped_upper {
                self.ticks.remove(&tick_upper);
            } else {
                self.ticks.insert(tick_upper, upper_info);
            }
        }
        self.liquidity = liquidity_next;
        self.positions.insert(key, position);

        Ok((amount0, amount1))
    }

    /// Adds liquidity to a position, returning the token amounts the
    /// caller owes the pool, rounded up.
    pub fn mint(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(U256, U256), Error> {
        if amount == 0 {
            return Err(PoolError::ZeroLiquidity.into());
        }
        if amount > i128::MAX as u128 {
            return Err(MathError::Overflow.into());
        }

        let (amount0, amount1) =
            self.modify_position(owner, tick_lower, tick_upper, amount as i128)?;
        Ok((amount0.unsigned_abs(), amount1.unsigned_abs()))
    }

    /// Removes liquidity from a position. The freed token amounts are
    /// rounded down and credited to `tokens_owed` for later collection.
    pub fn burn(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(U256, U256), Error> {
        if amount == 0 {
            return Err(PoolError::ZeroLiquidity.into());
        }
        if amount > i128::MAX as u128 {
            return Err(MathError::Overflow.into());
        }

        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        let held = self.positions.get(&key).map(|p| p.liquidity).unwrap_or(0);
        if held < amount {
            return Err(PoolError::InsufficientLiquidity.into());
        }

        let (amount0, amount1) =
            self.modify_position(owner, tick_lower, tick_upper, -(amount as i128))?;
        let owed0 = amount0.unsigned_abs();
        let owed1 = amount1.unsigned_abs();

        if let Some(position) = self.positions.get_mut(&key) {
            position.tokens_owed_0 += owed0;
            position.tokens_owed_1 += owed1;
        }

        Ok((owed0, owed1))
    }

    /// Zero-delta touch that settles accrued fees into `tokens_owed`
    /// without moving liquidity.
    pub fn poke(&mut self, owner: Address, tick_lower: i32, tick_upper: i32) -> Result<(), Error> {
        self.modify_position(owner, tick_lower, tick_upper, 0)
            .map(|_| ())
    }

    /// Withdraws up to the requested amounts from a position's
    /// `tokens_owed`, returning what was actually collected.
    pub fn collect(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: U256,
        amount1_requested: U256,
    ) -> Result<(U256, U256), Error> {
        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        let position = self
            .positions
            .get_mut(&key)
            .ok_or(PoolError::ZeroLiquidity)?;

        let amount0 = amount0_requested.min(position.tokens_owed_0);
        let amount1 = amount1_requested.min(position.tokens_owed_1);
        position.tokens_owed_0 -= amount0;
        position.tokens_owed_1 -= amount1;

        Ok((amount0, amount1))
    }
}
