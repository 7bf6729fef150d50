use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed, ToPrimitive};

use crate::error::{QuoteError, Result};

pub const SOL_DECIMALS: u32 = 9;

/// Parses a decimal amount such as `"1.5"` into base units with `decimals`
/// fractional digits. Exact: no float rounding, excess precision is an error.
pub fn to_base_units(amount: &str, decimals: u32) -> Result<u64> {
  let value = BigDecimal::from_str(amount.trim())
    .map_err(|_| QuoteError::InvalidAmount("not a decimal number"))?;

  if value.is_negative() {
    return Err(QuoteError::InvalidAmount("negative amount"));
  }

  let scale = BigDecimal::new(1.into(), -(decimals as i64));
  let scaled = value * scale;

  if !scaled.is_integer() {
    return Err(QuoteError::InvalidAmount("more fractional digits than the asset supports"));
  }

  scaled
    .to_u64()
    .ok_or(QuoteError::InvalidAmount("amount does not fit in 64 bits"))
}

/// Inverse of [`to_base_units`], trailing zeros trimmed.
pub fn format_base_units(amount: u64, decimals: u32) -> String {
  let unit = 10u128.pow(decimals);
  let whole = amount as u128 / unit;
  let fraction = amount as u128 % unit;

  if fraction == 0 {
    return whole.to_string();
  }

  let digits = format!("{:0width$}", fraction, width = decimals as usize);
  format!("{}.{}", whole, digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_to_base_units() {
    assert_eq!(to_base_units("1.5", SOL_DECIMALS).unwrap(), 1_500_000_000);
    assert_eq!(to_base_units("0.0015", SOL_DECIMALS).unwrap(), 1_500_000);
    assert_eq!(to_base_units("18.55676", 6).unwrap(), 18_556_760);
    assert_eq!(to_base_units(" 42 ", 0).unwrap(), 42);
  }

  #[test]
  fn test_to_base_units_rejects_bad_input() {
    assert!(matches!(to_base_units("abc", 6), Err(QuoteError::InvalidAmount(_))));
    assert!(matches!(to_base_units("-1", 6), Err(QuoteError::InvalidAmount(_))));
    assert!(matches!(to_base_units("0.0000001", 6), Err(QuoteError::InvalidAmount(_))));
    assert!(matches!(
      to_base_units("18446744073709551616", 0),
      Err(QuoteError::InvalidAmount(_))
    ));
  }

  #[test]
  fn test_format_base_units() {
    assert_eq!(format_base_units(1_500_000, SOL_DECIMALS), "0.0015");
    assert_eq!(format_base_units(2_000_000_000, SOL_DECIMALS), "2");
    assert_eq!(format_base_units(18_556_760, 6), "18.55676");
    assert_eq!(format_base_units(7, 0), "7");
  }
}
