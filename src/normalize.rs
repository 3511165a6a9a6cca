//! Expansion of abbreviated counts such as `1.2K` or `3M`.

use regex::Regex;
use std::sync::LazyLock;

/// Literal written for values that could not be determined.
pub const UNKNOWN: &str = "N/A";

/// Literal written for values lost to a page-level failure.
pub const ERROR: &str = "Error";

static COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d.]+)\s*([KMB]?)").expect("count pattern is valid")
});

/// Expand a count like `"1.2K"` into `"1200"`.
///
/// Thousands separators are stripped before matching. A `K`, `M` or `B`
/// suffix (any case) multiplies the number and the result is truncated
/// toward zero, with no upper bound. Without a suffix the matched digits are
/// returned as they are.
///
/// Text that holds no number comes back unchanged, so callers must accept
/// non-numeric output. Empty input and the `N/A` sentinel both yield `N/A`.
///
/// ```
/// use audiomack_metrics::normalize_count;
///
/// assert_eq!(normalize_count("1.2K"), "1200");
/// assert_eq!(normalize_count("12,345 plays"), "12345");
/// assert_eq!(normalize_count("N/A"), "N/A");
/// ```
pub fn normalize_count(text: &str) -> String {
    if text.is_empty() || text == UNKNOWN {
        return UNKNOWN.to_string();
    }

    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();

    let Some(captures) = COUNT.captures(cleaned) else {
        return text.to_string();
    };
    let number = &captures[1];

    let multiplier = match captures[2].to_ascii_uppercase().as_str() {
        "K" => 1e3,
        "M" => 1e6,
        "B" => 1e9,
        _ => return number.to_string(),
    };

    match number.parse::<f64>() {
        Ok(value) => format!("{:.0}", (value * multiplier).trunc()),
        Err(_) => {
            log::debug!("Unparsable count '{number}' in '{text}'");
            text.to_string()
        }
    }
}
