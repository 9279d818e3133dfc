//! Integer AMM math.
//!
//! All arithmetic is U256 with floor division, matching what the contracts
//! compute on-chain. No floating point anywhere in this module.

use crate::error::QuoteError;
use alloy::primitives::U256;

/// Constant-product output with the canonical 0.30% fee:
/// `floor(reserve_out * amount_in * 997 / (reserve_in * 1000 + amount_in * 997))`.
///
/// Zero reserves are a `ZeroLiquidity` error rather than a division by zero.
pub fn constant_product_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<U256, QuoteError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(QuoteError::ZeroLiquidity);
    }
    if amount_in.is_zero() {
        return Ok(U256::ZERO);
    }

    let fee_num = U256::from(997u64);
    let fee_den = U256::from(1000u64);

    let amount_with_fee = amount_in
        .checked_mul(fee_num)
        .ok_or_else(|| QuoteError::Malformed("arithmetic overflow".to_string()))?;
    let numerator = amount_with_fee
        .checked_mul(reserve_out)
        .ok_or_else(|| QuoteError::Malformed("arithmetic overflow".to_string()))?;
    let denominator = reserve_in
        .checked_mul(fee_den)
        .and_then(|v| v.checked_add(amount_with_fee))
        .ok_or_else(|| QuoteError::Malformed("arithmetic overflow".to_string()))?;

    Ok(numerator / denominator)
}

/// Breakeven target for a flash loan of `notional`: 0.05% loan fee plus a
/// 0.5% profit buffer, `floor(notional * 10055 / 10000)`. A round trip is
/// profitable only when the exit amount is strictly greater than this.
pub fn breakeven_target(notional: U256) -> Option<U256> {
    notional
        .checked_mul(U256::from(10_055u64))
        .map(|v| v / U256::from(10_000u64))
}

/// Minimum acceptable output for an executed leg: 0.3% slippage allowance,
/// `floor(amount_out * 997 / 1000)`.
///
/// Computed as `(q * 997) + floor(r * 997 / 1000)` for
/// `amount_out = q * 1000 + r`, which is exact and cannot overflow even at
/// `U256::MAX`.
pub fn slippage_minimum(amount_out: U256) -> U256 {
    let fee_num = U256::from(997u64);
    let fee_den = U256::from(1000u64);
    let quotient = amount_out / fee_den;
    let remainder = amount_out % fee_den;
    quotient * fee_num + remainder * fee_num / fee_den
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_constant_product_exact_formula() {
        // 1000 in against 1_000_000/2_000_000 reserves:
        // floor(2_000_000 * 997_000 / (1_000_000_000 + 997_000)) = 1992.019... -> 1992
        let out = constant_product_out(u(1000), u(1_000_000), u(2_000_000)).unwrap();
        assert_eq!(out, u(1992));
    }

    #[test]
    fn test_constant_product_small_pool_floor() {
        // floor(100 * 9970 / (100_000 + 9970)) = floor(9.066...) = 9
        let out = constant_product_out(u(10), u(100), u(100)).unwrap();
        assert_eq!(out, u(9));
    }

    #[test]
    fn test_zero_reserves_is_error_not_panic() {
        assert!(matches!(
            constant_product_out(u(10), U256::ZERO, u(100)),
            Err(QuoteError::ZeroLiquidity)
        ));
        assert!(matches!(
            constant_product_out(u(10), u(100), U256::ZERO),
            Err(QuoteError::ZeroLiquidity)
        ));
    }

    #[test]
    fn test_zero_input_zero_output() {
        let out = constant_product_out(U256::ZERO, u(100), u(100)).unwrap();
        assert_eq!(out, U256::ZERO);
    }

    #[test]
    fn test_overflow_is_error() {
        let res = constant_product_out(U256::MAX, u(1), U256::MAX);
        assert!(matches!(res, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_breakeven_target_floor() {
        // 1000 * 10055 / 10000 = 1005.5 -> 1005
        assert_eq!(breakeven_target(u(1000)), Some(u(1005)));
        // 10000 * 10055 / 10000 = 10055 exactly
        assert_eq!(breakeven_target(u(10_000)), Some(u(10_055)));
    }

    #[test]
    fn test_slippage_minimum() {
        assert_eq!(slippage_minimum(u(1000)), u(997));
        // floor(1018 * 997 / 1000) = floor(1014.946) = 1014
        assert_eq!(slippage_minimum(u(1018)), u(1014));
        // Split form matches the plain formula where it cannot overflow.
        assert_eq!(slippage_minimum(u(999)), u(999) * u(997) / u(1000));
    }

    #[test]
    fn test_slippage_minimum_max_amount_no_overflow() {
        let min = slippage_minimum(U256::MAX);
        assert!(min < U256::MAX);
        assert!(min > U256::MAX / u(1000) * u(996));
    }
}
