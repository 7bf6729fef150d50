use crate::curve::state::{CurveState, FeeStructure};
use crate::error::{QuoteError, Result};

/// 10,000 bps = 100%
pub const BPS_DENOMINATOR: u128 = 10_000;

/// floor(value * numerator / denominator), widened to u128 before dividing.
pub fn mul_div_floor(value: u128, numerator: u128, denominator: u128) -> Result<u128> {
  if denominator == 0 {
    return Err(QuoteError::DivisionByZero);
  }
  let product = value.checked_mul(numerator).ok_or(QuoteError::Overflow)?;
  Ok(product / denominator)
}

/// ceil(value * numerator / denominator)
pub fn mul_div_ceil(value: u128, numerator: u128, denominator: u128) -> Result<u128> {
  if denominator == 0 {
    return Err(QuoteError::DivisionByZero);
  }
  let product = value.checked_mul(numerator).ok_or(QuoteError::Overflow)?;
  let quotient = product / denominator;
  if product % denominator != 0 {
    Ok(quotient + 1)
  } else {
    Ok(quotient)
  }
}

/// K = (virtual + real tokens) * (virtual + real SOL)
pub fn compute_invariant(state: &CurveState) -> Result<u128> {
  state
    .effective_token_reserve()
    .checked_mul(state.effective_sol_reserve())
    .ok_or(QuoteError::Overflow)
}

/// Returns `(lp + protocol, lp + protocol + creator)`.
pub fn sum_fees(fees: &FeeStructure) -> Result<(u128, u128)> {
  let combined_fee_bps = fees.lp_fee_bps as u128 + fees.protocol_fee_bps as u128;
  let total_fee_bps = combined_fee_bps + fees.creator_fee_bps as u128;

  if total_fee_bps >= BPS_DENOMINATOR {
    return Err(QuoteError::InvalidFeeConfiguration {
      total_fee_bps: u64::try_from(total_fee_bps).unwrap_or(u64::MAX),
    });
  }

  Ok((combined_fee_bps, total_fee_bps))
}

pub fn apply_bps_floor(amount: u128, bps: u128) -> Result<u128> {
  mul_div_floor(amount, bps, BPS_DENOMINATOR)
}

pub fn to_u64(value: u128) -> Result<u64> {
  u64::try_from(value).map_err(|_| QuoteError::Overflow)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mul_div_rounding() {
    assert_eq!(mul_div_floor(10, 3, 4).unwrap(), 7);
    assert_eq!(mul_div_ceil(10, 3, 4).unwrap(), 8);
    assert_eq!(mul_div_floor(12, 3, 4).unwrap(), 9);
    assert_eq!(mul_div_ceil(12, 3, 4).unwrap(), 9);
    assert_eq!(mul_div_ceil(0, 3, 4).unwrap(), 0);
  }

  #[test]
  fn test_mul_div_zero_denominator() {
    assert_eq!(mul_div_floor(1, 1, 0), Err(QuoteError::DivisionByZero));
    assert_eq!(mul_div_ceil(1, 1, 0), Err(QuoteError::DivisionByZero));
  }

  #[test]
  fn test_mul_div_wide_intermediate() {
    // u64::MAX * 10_000 does not fit in 64 bits
    let value = u64::MAX as u128;
    assert_eq!(mul_div_floor(value, 10_000, 10_000).unwrap(), value);
    assert_eq!(mul_div_floor(u128::MAX, 2, 1), Err(QuoteError::Overflow));
  }

  #[test]
  fn test_compute_invariant() {
    let state = CurveState::new(40_000_000_000, 4_000_000_000, 20_000_000_000, 800_000_000);
    assert_eq!(compute_invariant(&state).unwrap(), 60_000_000_000u128 * 4_800_000_000u128);
  }

  #[test]
  fn test_sum_fees() {
    let fees = FeeStructure {
      lp_fee_bps: 30,
      protocol_fee_bps: 20,
      creator_fee_bps: 50,
    };
    assert_eq!(sum_fees(&fees).unwrap(), (50, 100));

    let broken = FeeStructure {
      lp_fee_bps: 9_000,
      protocol_fee_bps: 1_000,
      creator_fee_bps: 0,
    };
    assert_eq!(
      sum_fees(&broken),
      Err(QuoteError::InvalidFeeConfiguration { total_fee_bps: 10_000 })
    );
  }

  #[test]
  fn test_apply_bps_floor() {
    assert_eq!(apply_bps_floor(79_999, 50).unwrap(), 399);
    assert_eq!(apply_bps_floor(199, 50).unwrap(), 0);
  }
}
