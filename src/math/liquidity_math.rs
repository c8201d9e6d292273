use crate::error::MathError;

/// Applies a signed liquidity delta to an unsigned liquidity amount with
/// explicit overflow/underflow checks.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        let (z, underflow) = x.overflowing_sub(y.unsigned_abs());
        if underflow {
            return Err(MathError::Underflow);
        }
        Ok(z)
    } else {
        let (z, overflow) = x.overflowing_add(y as u128);
        if overflow {
            return Err(MathError::Overflow);
        }
        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_delta_adds_positive_delta() {
        assert_eq!(add_delta(100, 20).unwrap(), 120);
    }

    #[test]
    fn add_delta_subtracts_negative_delta() {
        assert_eq!(add_delta(100, -20).unwrap(), 80);
    }

    #[test]
    fn add_delta_zero_delta_returns_same() {
        assert_eq!(add_delta(123456789, 0).unwrap(), 123456789);
    }

    #[test]
    fn add_delta_positive_overflow() {
        assert!(matches!(add_delta(u128::MAX, 1), Err(MathError::Overflow)));
    }

    #[test]
    fn add_delta_exact_drain_reaches_zero() {
        assert_eq!(add_delta(1_000, -1_000).unwrap(), 0);
    }

    #[test]
    fn add_delta_negative_underflow() {
        assert!(matches!(add_delta(100, -200), Err(MathError::Underflow)));
    }

    #[test]
    fn add_delta_min_delta_magnitude() {
        // i128::MIN has no positive counterpart; unsigned_abs must handle it
        assert_eq!(add_delta(u128::MAX, i128::MIN).unwrap(), i128::MAX as u128);
    }
}
