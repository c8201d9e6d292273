use crate::FastMap;
use crate::error::{Error, PoolError, StateError};
use crate::math::tick_math::get_tick_at_sqrt_ratio;
use crate::pool::position::{PositionInfo, PositionKey};
use crate::pool::tick::{TickInfo, max_liquidity_per_tick};
use alloy_primitives::{Address, U256};

/// The frequently-read core of the pool state: current price and tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Protocol fees skimmed from swap fees, awaiting withdrawal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolFees {
    pub token0: U256,
    pub token1: U256,
}

/// In-memory state of one concentrated-liquidity pool.
///
/// All amounts are virtual: the pool computes token deltas and tracks
/// fee entitlements, custody of the tokens lives elsewhere. One `Pool`
/// value per pool; callers needing cross-pool concurrency own one value
/// each.
#[derive(Clone, Debug)]
pub struct Pool {
    /// Swap fee in hundredths of a basis point (e.g. 3000 = 0.3%).
    pub fee_pips: u32,
    pub tick_spacing: i32,
    pub max_liquidity_per_tick: u128,
    pub slot0: Slot0,
    /// Liquidity in range at the current price.
    pub liquidity: u128,
    pub fee_growth_global_0_x128: U256,
    pub fee_growth_global_1_x128: U256,
    /// 0 disables the protocol cut, otherwise 1/n of swap fees.
    pub fee_protocol: u8,
    pub protocol_fees: ProtocolFees,
    pub bitmap: FastMap<i16, U256>,
    pub ticks: FastMap<i32, TickInfo>,
    pub positions: FastMap<PositionKey, PositionInfo>,
}

impl Pool {
    /// Creates a pool at the given starting price.
    ///
    /// The initial tick is derived from the price, so the price may sit
    /// anywhere inside the tick, not only on a boundary.
    pub fn new(fee_pips: u32, tick_spacing: i32, sqrt_price_x96: U256) -> Result<Self, Error> {
        if tick_spacing <= 0 {
            return Err(StateError::InvalidTickSpacing.into());
        }
        if fee_pips >= 1_000_000 {
            return Err(PoolError::InvalidRange.into());
        }

        let tick = get_tick_at_sqrt_ratio(sqrt_price_x96)?;

        Ok(Self {
            fee_pips,
            tick_spacing,
            max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
            slot0: Slot0 {
                sqrt_price_x96,
                tick,
            },
            liquidity: 0,
            fee_growth_global_0_x128: U256::ZERO,
            fee_growth_global_1_x128: U256::ZERO,
            fee_protocol: 0,
            protocol_fees: ProtocolFees::default(),
            bitmap: FastMap::default(),
            ticks: FastMap::default(),
            positions: FastMap::default(),
        })
    }

    /// Sets the protocol share of swap fees: 0 to disable, or a divisor
    /// between 4 and 10 (1/4th to 1/10th of fees).
    pub fn set_fee_protocol(&mut self, fee_protocol: u8) -> Result<(), Error> {
        if fee_protocol != 0 && !(4..=10).contains(&fee_protocol) {
            return Err(PoolError::InvalidRange.into());
        }
        self.fee_protocol = fee_protocol;
        Ok(())
    }

    pub fn tick(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(&tick)
    }

    /// Net liquidity delta at an initialized tick, used while crossing.
    pub fn get_liquidity_net(&self, tick: &i32) -> Option<i128> {
        self.ticks.get(tick).map(|info| info.liquidity_net)
    }

    pub fn position(
        &self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Option<&PositionInfo> {
        self.positions.get(&PositionKey {
            owner,
            tick_lower,
            tick_upper,
        })
    }

    pub fn fee_growth_globals(&self) -> (U256, U256) {
        (self.fee_growth_global_0_x128, self.fee_growth_global_1_x128)
    }
}
