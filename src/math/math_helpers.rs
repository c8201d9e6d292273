use crate::error::MathError;
use alloy_primitives::U256;

const U256_ONE: U256 = U256::ONE;
const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

#[cold]
#[inline(never)]
fn cold_path() {}

#[inline(always)]
pub fn likely(b: bool) -> bool {
    if !b {
        cold_path();
    }
    b
}

#[inline(always)]
pub fn unlikely(b: bool) -> bool {
    if b {
        cold_path();
    }
    b
}

/// Computes `a * b / denominator` with the full 512-bit intermediate
/// product, returning a `MathError` on overflow or division by zero.
///
/// Mirrors the Solidity `FullMath.mulDiv` algorithm and underpins every
/// higher-level swap and liquidity calculation; the result is floored.
#[inline(always)]
pub fn mul_div(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if unlikely(denominator.is_zero()) {
        return Err(MathError::DivisionByZero);
    }

    // 512-bit product as (prod1, prod0)
    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);

    let (mut prod1, borrow) = mm.overflowing_sub(prod0);
    if borrow {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    // Short path: the product fits in 256 bits.
    if likely(prod1.is_zero()) {
        return Ok(prod0.wrapping_div(denominator));
    }

    if unlikely(denominator <= prod1) {
        return Err(MathError::Overflow);
    }

    // Subtract the remainder to make the 512-bit number divisible.
    let remainder = a.mul_mod(b, denominator);
    let (prod0_sub, borrow) = prod0.overflowing_sub(remainder);
    prod0 = prod0_sub;
    if borrow {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    // Factor powers of two out of the denominator.
    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_complement = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256_ONE);
    prod0 |= prod1.wrapping_mul(twos_complement);

    // Modular inverse of the (now odd) denominator via Newton-Raphson;
    // six iterations are exact for 2^256.
    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;

    macro_rules! newton_iteration {
        () => {
            inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)))
        };
    }

    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();

    Ok(prod0.wrapping_mul(inv))
}

/// Like [`mul_div`], but rounds the quotient up when there is a non-zero
/// remainder, failing with `MathError::Overflow` if the rounded result
/// would not fit in 256 bits.
#[inline(always)]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let mut result = mul_div(a, b, denominator)?;

    if a.mul_mod(b, denominator) > U256::ZERO {
        if result >= U256::MAX {
            return Err(MathError::Overflow);
        }
        result += U256::ONE;
    }
    Ok(result)
}

/// Divides `a` by `b`, rounding up on a non-zero remainder.
///
/// Panics on division by zero like primitive integer division; callers
/// must ensure `b != 0`.
#[inline(always)]
pub fn div_rounding_up(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_simple_division() {
        let result = mul_div(U256::from(10u8), U256::from(20u8), U256::from(5u8)).unwrap();
        assert_eq!(result, U256::from(40u8));
    }

    #[test]
    fn mul_div_division_by_zero() {
        let result = mul_div(U256::from(10u8), U256::from(20u8), U256::ZERO);
        assert!(matches!(result, Err(MathError::DivisionByZero)));
    }

    #[test]
    fn mul_div_floors_the_quotient() {
        // 7 * 10 / 8 = 8.75, floor is 8
        let result = mul_div(U256::from(7u8), U256::from(10u8), U256::from(8u8)).unwrap();
        assert_eq!(result, U256::from(8u8));
    }

    #[test]
    fn mul_div_wide_product_no_overflow() {
        // a * b does not fit in 256 bits but the quotient does:
        // (2^256 - 1) * (2^256 - 1) / (2^256 - 1) = 2^256 - 1
        let result = mul_div(U256::MAX, U256::MAX, U256::MAX).unwrap();
        assert_eq!(result, U256::MAX);
    }

    #[test]
    fn mul_div_result_overflow() {
        // (2^256 - 1) * 2 / 1 cannot fit in 256 bits
        let result = mul_div(U256::MAX, U256::from(2u8), U256::ONE);
        assert!(matches!(result, Err(MathError::Overflow)));
    }

    #[test]
    fn mul_div_rounding_up_exact_division() {
        let result =
            mul_div_rounding_up(U256::from(20u8), U256::from(10u8), U256::from(5u8)).unwrap();
        assert_eq!(result, U256::from(40u8));
    }

    #[test]
    fn mul_div_rounding_up_non_exact() {
        // 7 * 10 / 3 = 23.333..., rounds to 24
        let result =
            mul_div_rounding_up(U256::from(7u8), U256::from(10u8), U256::from(3u8)).unwrap();
        assert_eq!(result, U256::from(24u8));
    }

    #[test]
    fn mul_div_rounding_up_division_by_zero() {
        let result = mul_div_rounding_up(U256::from(10u8), U256::from(20u8), U256::ZERO);
        assert!(matches!(result, Err(MathError::DivisionByZero)));
    }

    #[test]
    fn mul_div_rounding_up_propagates_overflow() {
        let result = mul_div_rounding_up(U256::MAX, U256::from(2u8), U256::ONE);
        assert!(matches!(result, Err(MathError::Overflow)));
    }

    #[test]
    fn div_rounding_up_exact_division() {
        assert_eq!(
            div_rounding_up(U256::from(10u8), U256::from(5u8)),
            U256::from(2u8)
        );
    }

    #[test]
    fn div_rounding_up_non_exact() {
        // 10 / 3 = 3.333..., ceil => 4
        assert_eq!(
            div_rounding_up(U256::from(10u8), U256::from(3u8)),
            U256::from(4u8)
        );
    }

    #[test]
    fn div_rounding_up_large_non_exact() {
        // (2^256 - 1) / (2^256 - 2) rounds up to 2
        assert_eq!(
            div_rounding_up(U256::MAX, U256::MAX - U256::ONE),
            U256::from(2u8)
        );
    }

    #[test]
    #[should_panic]
    fn div_rounding_up_division_by_zero_panics() {
        let _ = div_rounding_up(U256::from(10u8), U256::ZERO);
    }
}
