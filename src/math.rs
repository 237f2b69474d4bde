use primitive_types::U256;

use crate::error::EngineError;

/// `a * b / divisor` with a 256-bit intermediate. Division truncates toward
/// zero. At 18-decimal scale a u128 intermediate overflows for realistic
/// balances, so the product is always computed wide.
pub fn mul_div(a: u128, b: u128, divisor: u128) -> Result<u128, EngineError> {
    if divisor == 0 {
        return Err(EngineError::DivisionByZero);
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(divisor);
    if wide > U256::from(u128::MAX) {
        return Err(EngineError::ArithmeticOverflow);
    }
    Ok(wide.as_u128())
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, EngineError> {
    a.checked_add(b).ok_or(EngineError::ArithmeticOverflow)
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, EngineError> {
    a.checked_sub(b).ok_or(EngineError::ArithmeticUnderflow)
}

/// `10^exp`, failing rather than wrapping for out-of-range exponents.
pub fn pow10(exp: u32) -> Result<u128, EngineError> {
    10u128.checked_pow(exp).ok_or(EngineError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRECISION;

    #[test]
    fn test_mul_div_basic() {
        assert_eq!(mul_div(6, 7, 2).unwrap(), 21);
        assert_eq!(mul_div(0, 7, 2).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_truncates_toward_zero() {
        assert_eq!(mul_div(7, 1, 2).unwrap(), 3);
        assert_eq!(mul_div(1, 1, 3).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // 2000e18 * 15e18 / 1e18 overflows u128 in the product but not in
        // the result.
        let price = 2_000 * PRECISION;
        let amount = 15 * PRECISION;
        assert_eq!(mul_div(price, amount, PRECISION).unwrap(), 30_000 * PRECISION);
    }

    #[test]
    fn test_mul_div_division_by_zero() {
        assert_eq!(mul_div(1, 1, 0), Err(EngineError::DivisionByZero));
    }

    #[test]
    fn test_mul_div_overflowing_result() {
        assert_eq!(
            mul_div(u128::MAX, u128::MAX, 1),
            Err(EngineError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert_eq!(checked_sub(1, 2), Err(EngineError::ArithmeticUnderflow));
        assert_eq!(checked_sub(2, 2).unwrap(), 0);
    }

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0).unwrap(), 1);
        assert_eq!(pow10(18).unwrap(), PRECISION);
        assert_eq!(pow10(40), Err(EngineError::ArithmeticOverflow));
    }
}
