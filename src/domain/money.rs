use super::ParseError;

/// Money is represented as integer minor units (cents) so sums stay exact.
/// For USD/EUR, 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Largest amount a single entry may carry (10 trillion units). Totals are
/// accumulated with saturating adds, so no ledger size can overflow them.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000_000;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Format cents with thousands separators, the way the dashboard shows totals.
/// Example: 123456789 -> "1,234,567.89"
pub fn format_grouped(cents: Cents) -> String {
    let plain = format_cents(cents);
    let (sign, rest) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (units, fraction) = rest.split_once('.').unwrap_or((rest, "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{fraction}")
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, ".75" -> 75
///
/// At most two significant fraction digits; trailing zeros beyond them are
/// accepted ("1.500"), anything else is a precision error.
pub fn parse_cents(input: &str) -> Result<Cents, ParseError> {
    let trimmed = input.trim();
    let invalid = || ParseError::Amount(input.to_string());

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (units_str, fraction_str) = digits.split_once('.').unwrap_or((digits, ""));
    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };

    if fraction_str.chars().skip(2).any(|c| c != '0') {
        return Err(ParseError::Precision(input.to_string()));
    }

    let mut fraction: i64 = 0;
    for (i, digit) in fraction_str.chars().take(2).enumerate() {
        let value = i64::from(digit.to_digit(10).ok_or_else(invalid)?);
        fraction += if i == 0 { value * 10 } else { value };
    }

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(invalid)?;

    Ok(if negative { -cents } else { cents })
}
