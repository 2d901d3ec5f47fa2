//! Column name canonicalization.

/// Canonical form of one column name.
///
/// Lower-cases, replaces every run of characters outside `[a-z0-9]` with a
/// single `_`, and strips leading/trailing `_`. May return an empty string;
/// callers substitute a positional name.
///
/// # Examples
///
/// ```
/// use scrub_clean::normalization::names::normalize_name;
///
/// assert_eq!(normalize_name("  Order Date (UTC) "), "order_date_utc");
/// assert_eq!(normalize_name("Price($)"), "price");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Name used for a column whose name normalizes to nothing (1-based).
pub fn positional_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Customer ID"), "customer_id");
        assert_eq!(normalize_name("__total__amount__"), "total_amount");
        assert_eq!(normalize_name("E-mail"), "e_mail");
        assert_eq!(normalize_name("already_clean"), "already_clean");
        assert_eq!(normalize_name("###"), "");
    }

    #[test]
    fn test_non_ascii_becomes_separator() {
        assert_eq!(normalize_name("Café Name"), "caf_name");
    }

    #[test]
    fn test_positional_name() {
        assert_eq!(positional_name(0), "column_1");
        assert_eq!(positional_name(4), "column_5");
    }
}
