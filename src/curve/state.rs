use serde::{Deserialize, Serialize};

use crate::curve::math;
use crate::error::Result;

/// Reserve snapshot of a bonding curve, read by the caller right before quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveState {
  pub virtual_token_reserves: u64,
  pub virtual_sol_reserves: u64,
  pub real_token_reserves: u64,
  pub real_sol_reserves: u64,

  #[serde(default)]
  pub creator: String,
}

impl CurveState {
  pub fn new(
    virtual_token_reserves: u64,
    virtual_sol_reserves: u64,
    real_token_reserves: u64,
    real_sol_reserves: u64,
  ) -> Self {
    Self {
      virtual_token_reserves,
      virtual_sol_reserves,
      real_token_reserves,
      real_sol_reserves,
      creator: String::new(),
    }
  }

  pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
    self.creator = creator.into();
    self
  }

  pub fn effective_token_reserve(&self) -> u128 {
    self.virtual_token_reserves as u128 + self.real_token_reserves as u128
  }

  pub fn effective_sol_reserve(&self) -> u128 {
    self.virtual_sol_reserves as u128 + self.real_sol_reserves as u128
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStructure {
  pub lp_fee_bps: u64,
  pub protocol_fee_bps: u64,
  pub creator_fee_bps: u64,
}

impl FeeStructure {
  /// Rejects fee sets that add up to 100% or more.
  pub fn new(lp_fee_bps: u64, protocol_fee_bps: u64, creator_fee_bps: u64) -> Result<Self> {
    let fees = Self {
      lp_fee_bps,
      protocol_fee_bps,
      creator_fee_bps,
    };
    math::sum_fees(&fees)?;
    Ok(fees)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuyQuote {
  pub token_amount: u64,
  /// Gross, fee-inclusive amount the buyer pays.
  pub total_sol_cost_lamports: u64,
  /// Portion that actually moves the curve.
  pub effective_sol_in_lamports: u64,
  /// LP + protocol fee.
  pub fee_lamports: u64,
  pub creator_fee_lamports: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SellQuote {
  /// Net amount the seller receives.
  pub sol_output_lamports: u64,
  pub pre_fee_sol_output_lamports: u64,
  pub fee_lamports: u64,
  pub creator_fee_lamports: u64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::QuoteError;

  #[test]
  fn test_fee_structure_rejects_full_fee() {
    assert_eq!(
      FeeStructure::new(5_000, 4_000, 1_000),
      Err(QuoteError::InvalidFeeConfiguration { total_fee_bps: 10_000 })
    );
    assert!(FeeStructure::new(5_000, 4_000, 999).is_ok());
  }

  #[test]
  fn test_effective_reserves_do_not_overflow_u64() {
    let state = CurveState::new(u64::MAX, u64::MAX, u64::MAX, 1);
    assert_eq!(state.effective_token_reserve(), 2 * u64::MAX as u128);
    assert_eq!(state.effective_sol_reserve(), u64::MAX as u128 + 1);
  }

  #[test]
  fn test_curve_state_loads_from_json_without_creator() {
    let json = r#"{
      "virtual_token_reserves": 40000000000,
      "virtual_sol_reserves": 4000000000,
      "real_token_reserves": 20000000000,
      "real_sol_reserves": 800000000
    }"#;
    let state: CurveState = serde_json::from_str(json).unwrap();
    assert_eq!(state, CurveState::new(40_000_000_000, 4_000_000_000, 20_000_000_000, 800_000_000));
  }
}
