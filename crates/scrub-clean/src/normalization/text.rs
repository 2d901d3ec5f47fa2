//! Text cell normalization.

use scrub_model::TextCase;

/// Tokens read as missing values, compared case-insensitively after trimming.
pub const NULL_TOKENS: &[&str] = &["nan", "none", "null"];

/// Trim and collapse every internal whitespace run to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for empty strings and the [`NULL_TOKENS`].
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Apply a case rule.
///
/// Title case upper-cases the first letter of every alphanumeric run and
/// lower-cases the rest, so `"o'neil-SMITH"` becomes `"O'Neil-Smith"`.
pub fn apply_case(value: &str, case: TextCase) -> String {
    match case {
        TextCase::Title => title_case(value),
        TextCase::Lower => value.to_lowercase(),
        TextCase::Upper => value.to_uppercase(),
        TextCase::Preserve => value.to_string(),
    }
}

fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphanumeric() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Clean one text cell: collapse whitespace, map null tokens to `None`,
/// then apply the case rule.
///
/// # Examples
///
/// ```
/// use scrub_clean::normalization::text::normalize_cell;
/// use scrub_model::TextCase;
///
/// assert_eq!(normalize_cell("  new   york ", TextCase::Title), Some("New York".to_string()));
/// assert_eq!(normalize_cell("NULL", TextCase::Title), None);
/// ```
pub fn normalize_cell(value: &str, case: TextCase) -> Option<String> {
    let collapsed = collapse_whitespace(value);
    if is_null_token(&collapsed) {
        return None;
    }
    Some(apply_case(&collapsed, case))
}
