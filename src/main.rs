use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use pumpswap_quote::config::Config;
use pumpswap_quote::curve::calculator;
use pumpswap_quote::curve::slippage::{max_sol_cost_with_slippage, min_sol_output_with_slippage};
use pumpswap_quote::units::{SOL_DECIMALS, format_base_units, to_base_units};
use pumpswap_quote::{
  BuyQuote, CurveState, quote_buy_with_sol_amount, quote_sell, quote_sol_cost_for_buy,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "quote")]
#[command(about = "Quote buys and sells against a bonding curve snapshot", long_about = None)]
struct Cli {
  /// JSON file holding the curve state; replaces the reserve flags
  #[arg(long, global = true)]
  state: Option<PathBuf>,

  #[arg(long, global = true)]
  virtual_token_reserves: Option<u64>,

  #[arg(long, global = true)]
  virtual_sol_reserves: Option<u64>,

  #[arg(long, global = true)]
  real_token_reserves: Option<u64>,

  #[arg(long, global = true)]
  real_sol_reserves: Option<u64>,

  /// Base58 creator address
  #[arg(long, global = true)]
  creator: Option<String>,

  #[arg(long, global = true)]
  lp_fee_bps: Option<u64>,

  #[arg(long, global = true)]
  protocol_fee_bps: Option<u64>,

  #[arg(long, global = true)]
  creator_fee_bps: Option<u64>,

  #[arg(long, global = true)]
  slippage_bps: Option<u64>,

  /// Print the quote as JSON instead of logging it
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Tokens received for an all-in SOL budget, e.g. `buy 0.5`
  Buy { sol: String },

  /// SOL needed to buy an exact token amount
  BuyExact { tokens: String },

  /// SOL received for selling an exact token amount
  Sell { tokens: String },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();
  let mut config = Config::from_env()?;
  apply_overrides(&mut config, &cli);

  let fees = config.fee_structure()?;
  let state = load_state(&cli)?;
  debug!("Curve state: {:?}", state);
  debug!("Fees: {:?}", fees);

  match &cli.command {
    Command::Buy { sol } => {
      let budget = to_base_units(sol, SOL_DECIMALS).context("Invalid SOL amount")?;
      let quote = quote_buy_with_sol_amount(&state, &fees, budget)?;
      report_buy(&cli, &config, &state, &quote)
    }
    Command::BuyExact { tokens } => {
      let amount = to_base_units(tokens, config.token_decimals).context("Invalid token amount")?;
      let quote = quote_sol_cost_for_buy(&state, &fees, amount)?;
      report_buy(&cli, &config, &state, &quote)
    }
    Command::Sell { tokens } => {
      let amount = to_base_units(tokens, config.token_decimals).context("Invalid token amount")?;
      let quote = quote_sell(&state, &fees, amount)?;
      let min_output = min_sol_output_with_slippage(quote.sol_output_lamports, config.slippage_bps)?;

      if cli.json {
        let output = json!({
          "quote": quote,
          "min_sol_output_lamports": min_output,
          "slippage_bps": config.slippage_bps,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
      }

      info!(
        "💸 SELL {} tokens -> {} SOL",
        tokens,
        format_base_units(quote.sol_output_lamports, SOL_DECIMALS)
      );
      info!(
        "   Pre-fee output: {} lamports",
        quote.pre_fee_sol_output_lamports
      );
      info!(
        "   Fees: {} lamports (creator: {})",
        quote.fee_lamports, quote.creator_fee_lamports
      );
      info!(
        "   Min output @ {} bps slippage: {} lamports",
        config.slippage_bps, min_output
      );
      Ok(())
    }
  }
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
  if let Some(bps) = cli.lp_fee_bps {
    config.lp_fee_bps = bps;
  }
  if let Some(bps) = cli.protocol_fee_bps {
    config.protocol_fee_bps = bps;
  }
  if let Some(bps) = cli.creator_fee_bps {
    config.creator_fee_bps = bps;
  }
  if let Some(bps) = cli.slippage_bps {
    config.slippage_bps = bps;
  }
}

fn load_state(cli: &Cli) -> Result<CurveState> {
  let mut state = match &cli.state {
    Some(path) => {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read curve state from {}", path.display()))?;
      serde_json::from_str::<CurveState>(&raw)
        .with_context(|| format!("Failed to parse curve state in {}", path.display()))?
    }
    None => {
      let required = |value: Option<u64>, flag: &str| {
        value.ok_or_else(|| anyhow!("--{} is required when --state is not given", flag))
      };
      CurveState::new(
        required(cli.virtual_token_reserves, "virtual-token-reserves")?,
        required(cli.virtual_sol_reserves, "virtual-sol-reserves")?,
        required(cli.real_token_reserves, "real-token-reserves")?,
        required(cli.real_sol_reserves, "real-sol-reserves")?,
      )
    }
  };

  if let Some(creator) = &cli.creator {
    state = state.with_creator(creator.as_str());
  }
  if !state.creator.is_empty() {
    validate_creator(&state.creator)?;
  }

  Ok(state)
}

fn validate_creator(creator: &str) -> Result<()> {
  let bytes = bs58::decode(creator)
    .into_vec()
    .with_context(|| format!("Creator {} is not valid base58", creator))?;
  if bytes.len() != 32 {
    bail!("Creator {} decodes to {} bytes, expected 32", creator, bytes.len());
  }
  Ok(())
}

fn report_buy(cli: &Cli, config: &Config, state: &CurveState, quote: &BuyQuote) -> Result<()> {
  let max_cost = max_sol_cost_with_slippage(quote.total_sol_cost_lamports, config.slippage_bps)?;
  let impact = calculator::calculate_price_impact(quote, state);

  if cli.json {
    let output = json!({
      "quote": quote,
      "max_sol_cost_lamports": max_cost,
      "slippage_bps": config.slippage_bps,
      "price_impact_pct": impact,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    return Ok(());
  }

  let spot = calculator::calculate_price_sol(state, config.token_decimals);

  info!(
    "💰 BUY {} tokens for {} SOL",
    format_base_units(quote.token_amount, config.token_decimals),
    format_base_units(quote.total_sol_cost_lamports, SOL_DECIMALS)
  );
  info!(
    "   Into curve: {} lamports",
    quote.effective_sol_in_lamports
  );
  info!(
    "   Fees: {} lamports (creator: {})",
    quote.fee_lamports, quote.creator_fee_lamports
  );
  info!("   Spot price: {:.12} SOL, impact {:.4}%", spot, impact);
  info!(
    "   Max cost @ {} bps slippage: {} lamports",
    config.slippage_bps, max_cost
  );
  Ok(())
}
