use rust_decimal::{Decimal, RoundingStrategy};

/// Normalizes input for decimal parsing: trims whitespace, removes a leading
/// `$` and commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    trimmed.replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles `$` and comma thousands separators (e.g. `"$1,234.56"`).
/// Empty or whitespace-only input is treated as 0. Invalid input is also
/// treated as 0 and logged.
pub fn parse_decimal(s: &str) -> Decimal {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized.parse().unwrap_or_else(|e| {
        tracing::warn!(input = %s, "invalid decimal, using 0: {}", e);
        Decimal::ZERO
    })
}

/// Parses a string into an optional [`Decimal`].
///
/// Handles `$` and comma thousands separators. Returns `None` for empty or
/// whitespace-only input, or when parsing fails (logs a warning on parse
/// failure).
pub fn parse_optional_decimal(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        None
    } else {
        normalized.parse().map_or_else(
            |e| {
                tracing::warn!(input = %s, "invalid optional decimal: {}", e);
                None
            },
            Some,
        )
    }
}

/// Formats dollars with thousands separators and cents: `$12,505.00`,
/// `-$1,505.00`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a difference with an explicit sign: `+$748.80`, `-$5,516.40`.
/// Zero has no sign.
pub fn format_change(amount: Decimal) -> String {
    let formatted = format_currency(amount);
    if formatted.starts_with('-') || formatted == "$0.00" {
        formatted
    } else {
        format!("+{formatted}")
    }
}

/// Formats a rate as a percentage with `dp` decimal places: `0.24` → `24%`
/// at 0, `0.033928` → `3.4%` at 1.
pub fn format_percent(
    rate: Decimal,
    dp: u32,
) -> String {
    let percent =
        (rate * Decimal::ONE_HUNDRED).round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", dp as usize, percent)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
