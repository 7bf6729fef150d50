//! Caller-side guards derived from a quote. Each applies the tolerance once.

use crate::curve::math::{BPS_DENOMINATOR, mul_div_ceil, to_u64};
use crate::error::{QuoteError, Result};

fn check_slippage(slippage_bps: u64) -> Result<u128> {
  if slippage_bps as u128 > BPS_DENOMINATOR {
    return Err(QuoteError::InvalidSlippage(slippage_bps));
  }
  Ok(slippage_bps as u128)
}

/// Highest SOL cost to accept for a buy quoted at `sol_cost_lamports`.
pub fn max_sol_cost_with_slippage(sol_cost_lamports: u64, slippage_bps: u64) -> Result<u64> {
  let bps = check_slippage(slippage_bps)?;
  let padding = mul_div_ceil(sol_cost_lamports as u128, bps, BPS_DENOMINATOR)?;
  to_u64(sol_cost_lamports as u128 + padding)
}

/// Lowest SOL output to accept for a sell quoted at `sol_output_lamports`.
pub fn min_sol_output_with_slippage(sol_output_lamports: u64, slippage_bps: u64) -> Result<u64> {
  let bps = check_slippage(slippage_bps)?;
  let haircut = mul_div_ceil(sol_output_lamports as u128, bps, BPS_DENOMINATOR)?;
  to_u64(sol_output_lamports as u128 - haircut)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_max_cost_pads_once() {
    assert_eq!(max_sol_cost_with_slippage(1_500_000, 100).unwrap(), 1_515_000);
    // 1% of 101 rounds up to 2
    assert_eq!(max_sol_cost_with_slippage(101, 100).unwrap(), 103);
    assert_eq!(max_sol_cost_with_slippage(1_500_000, 0).unwrap(), 1_500_000);
  }

  #[test]
  fn test_min_output_trims_once() {
    assert_eq!(min_sol_output_with_slippage(79_201, 100).unwrap(), 78_408);
    assert_eq!(min_sol_output_with_slippage(79_201, 10_000).unwrap(), 0);
  }

  #[test]
  fn test_slippage_out_of_range() {
    assert_eq!(
      max_sol_cost_with_slippage(1_000, 10_001),
      Err(QuoteError::InvalidSlippage(10_001))
    );
    assert_eq!(
      max_sol_cost_with_slippage(u64::MAX, 100),
      Err(QuoteError::Overflow)
    );
  }
}
