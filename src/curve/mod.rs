pub mod calculator;
pub mod math;
pub mod slippage;
pub mod state;

use tracing::debug;

use crate::error::{QuoteError, Result};
use math::{
  BPS_DENOMINATOR, apply_bps_floor, compute_invariant, mul_div_ceil, mul_div_floor, sum_fees,
  to_u64,
};
pub use state::{BuyQuote, CurveState, FeeStructure, SellQuote};

/// One-by-one decrements tried before the refinement switches to bisection.
const LINEAR_REFINEMENT_STEPS: u64 = 16;

fn starting_reserves(state: &CurveState) -> Result<(u128, u128)> {
  let token_reserve = state.effective_token_reserve();
  let sol_reserve = state.effective_sol_reserve();
  if token_reserve == 0 || sol_reserve == 0 {
    return Err(QuoteError::DivisionByZero);
  }
  Ok((token_reserve, sol_reserve))
}

/// Tokens a buyer receives for an all-in, fee-inclusive SOL budget.
///
/// The returned quote's `total_sol_cost_lamports` is the exact cost of the
/// quoted token amount and never exceeds `total_sol_cost_lamports`.
pub fn quote_buy_with_sol_amount(
  state: &CurveState,
  fees: &FeeStructure,
  total_sol_cost_lamports: u64,
) -> Result<BuyQuote> {
  let (combined_fee_bps, _) = sum_fees(fees)?;

  let budget = total_sol_cost_lamports as u128;
  let fee = apply_bps_floor(budget, combined_fee_bps)?;
  let creator_fee = apply_bps_floor(budget, fees.creator_fee_bps as u128)?;
  let effective_sol_in = budget - fee - creator_fee;
  if effective_sol_in == 0 {
    return Err(QuoteError::NonPositiveNetInput);
  }

  let (starting_token, starting_sol) = starting_reserves(state)?;
  let k = compute_invariant(state)?;

  let ending_sol = starting_sol + effective_sol_in;
  let ending_token = mul_div_floor(k, 1, ending_sol)?;
  let raw_tokens_out = starting_token.saturating_sub(ending_token);

  let candidate = raw_tokens_out.min(state.real_token_reserves as u128);
  if candidate == 0 {
    return Err(QuoteError::InsufficientOutput);
  }

  refine_buy(state, fees, to_u64(candidate)?, total_sol_cost_lamports)
}

/// Walks `candidate` down until its exact cost fits `budget`.
///
/// Cost is monotone in the token amount, so after a short run of single
/// decrements the search bisects between zero and the last candidate that was
/// over budget; both phases land on the same token amount.
fn refine_buy(
  state: &CurveState,
  fees: &FeeStructure,
  mut candidate: u64,
  budget: u64,
) -> Result<BuyQuote> {
  let mut steps = 0;
  let refined = loop {
    if fits_budget(state, fees, candidate, budget)? {
      break candidate;
    }
    if steps == LINEAR_REFINEMENT_STEPS {
      debug!(
        "Refinement still over budget after {} steps at {} tokens, bisecting",
        steps, candidate
      );
      break bisect_affordable(state, fees, candidate, budget)?;
    }
    candidate -= 1;
    steps += 1;
    if candidate == 0 {
      break 0;
    }
  };

  affordable_quote(state, fees, refined)
}

/// Largest amount below `over_budget` that fits, or zero if none does.
fn bisect_affordable(
  state: &CurveState,
  fees: &FeeStructure,
  over_budget: u64,
  budget: u64,
) -> Result<u64> {
  let (mut lo, mut hi) = (0u64, over_budget);
  while hi - lo > 1 {
    let mid = lo + (hi - lo) / 2;
    if fits_budget(state, fees, mid, budget)? {
      lo = mid;
    } else {
      hi = mid;
    }
  }

  debug!("Refined buy from {} to {} tokens", over_budget, lo);
  Ok(lo)
}

/// Quote for the refined amount. Zero tokens, or an amount whose net cost
/// rounds to nothing, means the budget buys no whole unit.
fn affordable_quote(state: &CurveState, fees: &FeeStructure, token_amount: u64) -> Result<BuyQuote> {
  if token_amount == 0 {
    return Err(QuoteError::InsufficientBudget);
  }
  quote_sol_cost_for_buy(state, fees, token_amount).map_err(|err| match err {
    QuoteError::NonPositiveInput => QuoteError::InsufficientBudget,
    other => other,
  })
}

fn fits_budget(
  state: &CurveState,
  fees: &FeeStructure,
  token_amount: u64,
  budget: u64,
) -> Result<bool> {
  match quote_sol_cost_for_buy(state, fees, token_amount) {
    Ok(quote) => Ok(quote.total_sol_cost_lamports <= budget),
    // zero net cost is within any budget
    Err(QuoteError::NonPositiveInput) => Ok(true),
    Err(err) => Err(err),
  }
}

/// Gross SOL cost of buying exactly `token_amount` tokens.
pub fn quote_sol_cost_for_buy(
  state: &CurveState,
  fees: &FeeStructure,
  token_amount: u64,
) -> Result<BuyQuote> {
  let (combined_fee_bps, total_fee_bps) = sum_fees(fees)?;

  if token_amount == 0 || token_amount > state.real_token_reserves {
    return Err(QuoteError::ExceedsReserves {
      requested: token_amount,
      available: state.real_token_reserves,
    });
  }

  let (starting_token, starting_sol) = starting_reserves(state)?;
  let k = compute_invariant(state)?;

  let ending_token = starting_token - token_amount as u128;
  if ending_token == 0 {
    return Err(QuoteError::ReservesExhausted);
  }

  let ending_sol = mul_div_floor(k, 1, ending_token)?;
  let effective_sol_in = ending_sol.saturating_sub(starting_sol);
  if effective_sol_in == 0 {
    return Err(QuoteError::NonPositiveInput);
  }

  let total_sol_cost = mul_div_ceil(
    effective_sol_in,
    BPS_DENOMINATOR,
    BPS_DENOMINATOR - total_fee_bps,
  )?;
  let fee = apply_bps_floor(total_sol_cost, combined_fee_bps)?;
  let creator_fee = apply_bps_floor(total_sol_cost, fees.creator_fee_bps as u128)?;

  Ok(BuyQuote {
    token_amount,
    total_sol_cost_lamports: to_u64(total_sol_cost)?,
    // >= effective_sol_in because of the ceiling above
    effective_sol_in_lamports: to_u64(total_sol_cost - fee - creator_fee)?,
    fee_lamports: to_u64(fee)?,
    creator_fee_lamports: to_u64(creator_fee)?,
  })
}

/// SOL a seller receives for `token_amount` tokens, net of fees.
pub fn quote_sell(state: &CurveState, fees: &FeeStructure, token_amount: u64) -> Result<SellQuote> {
  let (combined_fee_bps, _) = sum_fees(fees)?;

  let (starting_token, starting_sol) = starting_reserves(state)?;
  let k = compute_invariant(state)?;

  let ending_token = starting_token + token_amount as u128;
  let ending_sol = mul_div_floor(k, 1, ending_token)?;

  let pre_fee_sol_output = starting_sol.saturating_sub(ending_sol);
  if pre_fee_sol_output == 0 {
    return Err(QuoteError::NoOutputAvailable);
  }

  let fee = apply_bps_floor(pre_fee_sol_output, combined_fee_bps)?;
  let creator_fee = apply_bps_floor(pre_fee_sol_output, fees.creator_fee_bps as u128)?;
  let sol_output = pre_fee_sol_output - fee - creator_fee;
  if sol_output == 0 {
    return Err(QuoteError::NonPositiveOutput);
  }

  Ok(SellQuote {
    sol_output_lamports: to_u64(sol_output)?,
    pre_fee_sol_output_lamports: to_u64(pre_fee_sol_output)?,
    fee_lamports: to_u64(fee)?,
    creator_fee_lamports: to_u64(creator_fee)?,
  })
}
