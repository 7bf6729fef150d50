use thiserror::Error;

/// Every way a quote can be refused. None of these are transient: the same
/// inputs fail the same way, so the caller needs new inputs, not a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
  #[error("division by zero: reserves or denominator collapsed to zero")]
  DivisionByZero,

  #[error("total fee bps ({total_fee_bps}) must be below 10000")]
  InvalidFeeConfiguration { total_fee_bps: u64 },

  #[error("net SOL input is zero after fee extraction")]
  NonPositiveNetInput,

  #[error("required SOL input is zero for this token amount")]
  NonPositiveInput,

  #[error("SOL output is zero after fee extraction")]
  NonPositiveOutput,

  #[error("budget buys no tokens at current reserves")]
  InsufficientOutput,

  #[error("budget cannot cover the cost of a single token unit")]
  InsufficientBudget,

  #[error("token amount {requested} exceeds real token reserves {available}")]
  ExceedsReserves { requested: u64, available: u64 },

  #[error("buy would exhaust the token reserve")]
  ReservesExhausted,

  #[error("sell produces no SOL output")]
  NoOutputAvailable,

  #[error("arithmetic overflow")]
  Overflow,

  #[error("slippage bps ({0}) must not exceed 10000")]
  InvalidSlippage(u64),

  #[error("invalid amount: {0}")]
  InvalidAmount(&'static str),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
