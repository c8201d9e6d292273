//! Concentrated-liquidity AMM pool core in pure Rust.
//!
//! This crate implements the pricing and liquidity-accounting engine of a
//! concentrated-liquidity pool:
//! - Low-level fixed-point math (`math::*`) for ticks, sqrt prices,
//!   amount deltas and bounded swap steps.
//! - A sparse tick map with per-tick gross/net liquidity and
//!   fee-growth-outside accumulators.
//! - A position ledger tracking owed fees via fee-growth-inside snapshots.
//! - An in-memory [`Pool`] executing swaps, mints and burns atomically:
//!   an operation either fully applies or leaves the pool untouched.
//!
//! The core computes token amounts; it never moves value. Custody,
//! events and access control belong to the surrounding layer.
//!
//! # Example
//!
//! ```
//! use clmm_pool::{Address, I256, Pool, Q96, U256};
//! use clmm_pool::math::tick_math::MIN_SQRT_RATIO;
//! use clmm_pool::pool::swap::SwapParams;
//!
//! // 1% fee tier, tick spacing 200, price ratio 1:1.
//! let mut pool = Pool::new(10_000, 200, Q96).unwrap();
//!
//! let owner = Address::ZERO;
//! let liquidity = 2_000_000_000_000_000_000u128; // 2e18
//! let (amount0, amount1) = pool.mint(owner, -887_200, 887_200, liquidity).unwrap();
//! assert!(amount0 > U256::ZERO && amount1 > U256::ZERO);
//!
//! // Exact-input swap of 1e18 token0 for token1.
//! let params = SwapParams::new(
//!     true,
//!     I256::from_raw(U256::from(1_000_000_000_000_000_000u128)),
//!     MIN_SQRT_RATIO,
//! );
//! let result = pool.swap(params).unwrap();
//! assert!(result.amount0 > I256::ZERO); // pool receives token0
//! assert!(result.amount1 < I256::ZERO); // pool pays out token1
//! ```

pub use alloy_primitives::{Address, I256, U256};

pub mod error;
mod hash;
pub mod math;
pub mod pool;

pub use hash::FastMap;

pub use pool::state::Pool;

const U256_1: U256 = U256::from_limbs([1, 0, 0, 0]);

const U160_MAX: U256 = U256::from_limbs([0, 0, 4294967296, 0]);
const U256_E4: U256 = U256::from_limbs([10000, 0, 0, 0]);
const U256_E6: U256 = U256::from_limbs([1000000, 0, 0, 0]);

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
pub const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);
