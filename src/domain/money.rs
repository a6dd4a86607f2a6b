use std::fmt;

/// Money is kept as a plain decimal amount in currency units.
/// Stakes, odds and payouts are all `f64`, the same representation the
/// persisted snapshots use.
pub type Amount = f64;

/// Format an amount as a human-readable currency string with two decimals.
/// Example: 50.0 -> "50.00", -12.345 -> "-12.35"
pub fn format_amount(amount: Amount) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    // Avoid printing "-0.00" for tiny negative values.
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Parse a decimal string into an amount.
/// Accepts "50", "12.5", ".50" and the comma separator used by many
/// bookmakers ("12,50").
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let negative = input.starts_with('-');
    let digits = input.trim_start_matches('-').replace(',', ".");

    let separators = digits.chars().filter(|c| *c == '.').count();
    let well_formed = separators <= 1
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !well_formed {
        return Err(ParseAmountError::InvalidFormat(input.to_string()));
    }

    let value: f64 = digits
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))?;
    Ok(if negative { -value } else { value })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "empty amount"),
            ParseAmountError::InvalidFormat(s) => write!(f, "invalid money format: {}", s),
        }
    }
}

impl std::error::Error for ParseAmountError {}
