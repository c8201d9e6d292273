use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("BitMath error - zero input value")]
    ZeroValue,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State error - tick out of bounds")]
    InvalidTick,
    #[error("State error - tick is not a multiple of the pool tick spacing")]
    InvalidTickSpacing,
    #[error("State error - sqrt ratio out of bounds")]
    InvalidSqrtRatio,
    #[error("State error - price escapes the valid sqrt ratio range")]
    PriceOutOfBounds,
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Pool error - tick range is invalid")]
    InvalidRange,
    #[error("Pool error - swap amount specified is zero")]
    ZeroAmount,
    #[error("Pool error - liquidity amount is zero")]
    ZeroLiquidity,
    #[error("Pool error - not enough liquidity to satisfy the request")]
    InsufficientLiquidity,
    #[error("Pool error - price limit already reached")]
    PriceLimitAlreadyReached,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    PoolError(#[from] crate::error::PoolError),
}
