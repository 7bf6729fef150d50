//! Integer-exact quote engine for constant-product bonding curves with
//! LP, protocol and creator fees in basis points.

pub mod config;
pub mod curve;
pub mod error;
pub mod units;

pub use curve::{
  BuyQuote, CurveState, FeeStructure, SellQuote, quote_buy_with_sol_amount, quote_sell,
  quote_sol_cost_for_buy,
};
pub use error::QuoteError;
