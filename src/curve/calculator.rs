//! Display helpers. Floating point is fine here; nothing in the quote path
//! reads these values.

use crate::curve::state::{BuyQuote, CurveState};

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

fn token_scale(token_decimals: u32) -> f64 {
  10f64.powi(token_decimals as i32)
}

/// SOL per whole token at the current effective reserves.
pub fn calculate_price_sol(state: &CurveState, token_decimals: u32) -> f64 {
  let token_reserve = state.effective_token_reserve();
  if token_reserve == 0 {
    return 0.0;
  }

  let sol = state.effective_sol_reserve() as f64 / LAMPORTS_PER_SOL;
  let tokens = token_reserve as f64 / token_scale(token_decimals);

  sol / tokens
}

/// How far (in percent) the quote's net execution price sits above spot.
pub fn calculate_price_impact(quote: &BuyQuote, state: &CurveState) -> f64 {
  let token_reserve = state.effective_token_reserve();
  if quote.token_amount == 0 || token_reserve == 0 {
    return 0.0;
  }

  let spot = state.effective_sol_reserve() as f64 / token_reserve as f64;
  let execution = quote.effective_sol_in_lamports as f64 / quote.token_amount as f64;

  ((execution / spot) - 1.0).max(0.0) * 100.0
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curve::{FeeStructure, quote_buy_with_sol_amount};

  fn state() -> CurveState {
    CurveState::new(40_000_000_000, 4_000_000_000, 20_000_000_000, 800_000_000)
  }

  #[test]
  fn test_price_calculation() {
    // 4.8 SOL over 60,000 whole tokens
    let price = calculate_price_sol(&state(), 6);
    assert!((price - 0.00008).abs() < 1e-12);
  }

  #[test]
  fn test_price_impact_grows_with_size() {
    let state = state();
    let fees = FeeStructure::new(30, 20, 50).unwrap();

    let small = quote_buy_with_sol_amount(&state, &fees, 1_500_000).unwrap();
    let large = quote_buy_with_sol_amount(&state, &fees, 1_500_000_000).unwrap();

    let small_impact = calculate_price_impact(&small, &state);
    let large_impact = calculate_price_impact(&large, &state);
    assert!(small_impact < 0.1);
    assert!(large_impact > small_impact);
    assert!(large_impact > 20.0);
  }
}
