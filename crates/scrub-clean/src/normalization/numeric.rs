//! Lenient numeric parsing for currency, percent and accounting formats.

use std::sync::LazyLock;

use regex::Regex;

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:USD|EUR|JPY|GBP|INR|AUD|CAD|CHF|CNY|HKD|SGD|MXN|NZD|SEK|NOK|DKK|KRW|RUB|BRL|ZAR|THB|TRY|PLN|HUF|CZK|ILS|AED|SAR|PHP|IDR|MYR|VND)\b|(?:A|C|NZ|S|R|HK)?\$|[€¥£₹₩₽₺₪₦₱₫฿]",
    )
    .expect("Invalid currency regex")
});

/// Parse a numeric string as found in exported reports.
///
/// Strips currency symbols and ISO codes, thousands separators (`,`, `'`,
/// spaces, NBSP), reads `(1,234)` as `-1234`, and divides by 100 when a
/// trailing `%` is present. Non-finite results are rejected.
///
/// # Examples
///
/// ```
/// use scrub_clean::normalization::numeric::parse_numeric;
///
/// assert_eq!(parse_numeric("$1,234.50"), Some(1234.5));
/// assert_eq!(parse_numeric("(200)"), Some(-200.0));
/// assert_eq!(parse_numeric("45%"), Some(0.45));
/// assert_eq!(parse_numeric("n/a"), None);
/// ```
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = CURRENCY_RE.replace_all(trimmed, "");
    let mut body: String = stripped
        .chars()
        .filter(|c| !matches!(c, ',' | '\'' | '\u{a0}' | '\u{202f}') && !c.is_whitespace())
        .collect();

    let mut negative = false;
    if body.starts_with('(') && body.ends_with(')') && body.len() > 2 {
        negative = true;
        body = body[1..body.len() - 1].to_string();
    }

    let mut divisor = 1.0;
    if let Some(rest) = body.strip_suffix('%') {
        divisor = 100.0;
        body = rest.to_string();
    }

    if !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let parsed: f64 = body.parse().ok()?;
    let signed = if negative { -parsed } else { parsed };
    let result = signed / divisor;
    result.is_finite().then_some(result)
}
