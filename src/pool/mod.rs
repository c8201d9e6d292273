pub mod liquidity;
pub mod position;
pub mod state;
pub mod swap;
pub mod tick;
