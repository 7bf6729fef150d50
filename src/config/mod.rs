use anyhow::{Context, Result};
use std::env;

use crate::curve::FeeStructure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub lp_fee_bps: u64,
  pub protocol_fee_bps: u64,
  pub creator_fee_bps: u64,
  pub slippage_bps: u64,
  pub token_decimals: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      lp_fee_bps: 20,
      protocol_fee_bps: 5,
      creator_fee_bps: 5,
      slippage_bps: 100,
      token_decimals: 6,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self> {
    dotenv::dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    Ok(Self {
      lp_fee_bps: parse_or(&lookup, "LP_FEE_BPS", defaults.lp_fee_bps)?,

      protocol_fee_bps: parse_or(&lookup, "PROTOCOL_FEE_BPS", defaults.protocol_fee_bps)?,

      creator_fee_bps: parse_or(&lookup, "CREATOR_FEE_BPS", defaults.creator_fee_bps)?,

      slippage_bps: parse_or(&lookup, "SLIPPAGE_BPS", defaults.slippage_bps)?,

      token_decimals: parse_or(&lookup, "TOKEN_DECIMALS", defaults.token_decimals)?,
    })
  }

  pub fn fee_structure(&self) -> Result<FeeStructure> {
    FeeStructure::new(self.lp_fee_bps, self.protocol_fee_bps, self.creator_fee_bps)
      .context("Configured fees are invalid")
  }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match lookup(key) {
    Some(raw) => raw
      .trim()
      .parse()
      .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
    None => Ok(default),
  }
}
