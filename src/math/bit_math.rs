use crate::error::MathError;
use alloy_primitives::U256;

/// Returns the index (0-255) of the most significant set bit of `x`, or
/// `MathError::ZeroValue` for a zero input.
pub fn most_significant_bit(x: U256) -> Result<u8, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(255 - x.leading_zeros() as u8)
}

/// Returns the index (0-255) of the least significant set bit of `x`, or
/// `MathError::ZeroValue` for a zero input.
///
/// Used when scanning bitmap words upward for the first initialized tick.
pub fn least_significant_bit(x: U256) -> Result<u8, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(x.trailing_zeros() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_errors_on_zero() {
        assert!(matches!(
            most_significant_bit(U256::ZERO),
            Err(MathError::ZeroValue)
        ));
    }

    #[test]
    fn msb_of_power_of_two() {
        assert_eq!(most_significant_bit(U256::from(1u64 << 7)).unwrap(), 7);
    }

    #[test]
    fn msb_ignores_lower_bits() {
        // binary 1001_0100, MSB at bit 7
        assert_eq!(most_significant_bit(U256::from(0b1001_0100u64)).unwrap(), 7);
    }

    #[test]
    fn msb_of_max_u256() {
        assert_eq!(most_significant_bit(U256::MAX).unwrap(), 255);
    }

    #[test]
    fn lsb_errors_on_zero() {
        assert!(matches!(
            least_significant_bit(U256::ZERO),
            Err(MathError::ZeroValue)
        ));
    }

    #[test]
    fn lsb_of_power_of_two() {
        assert_eq!(least_significant_bit(U256::from(1u64 << 12)).unwrap(), 12);
    }

    #[test]
    fn lsb_ignores_higher_bits() {
        // binary 1011001000, LSB at bit 3
        assert_eq!(
            least_significant_bit(U256::from(0b1011001000u64)).unwrap(),
            3
        );
    }

    #[test]
    fn lsb_of_max_u256() {
        assert_eq!(least_significant_bit(U256::MAX).unwrap(), 0);
    }
}
