//! Number formatting shared by cell renderers and the totals row.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::FromPrimitive;

use super::RenderConfig;

/// Grouped number with up to two decimals, trailing zeros trimmed.
///
/// ```
/// use budgetgrid_lib::render::{RenderConfig, format_number};
///
/// let config = RenderConfig::default();
/// assert_eq!(format_number(1234567.891, &config), "1,234,567.89");
/// assert_eq!(format_number(12.5, &config), "12.5");
/// assert_eq!(format_number(-3.0, &config), "-3");
/// ```
pub fn format_number(value: f64, config: &RenderConfig) -> String {
    match Decimal::from_f64(value) {
        Some(d) => format_decimal(d, 2, true, config),
        None => value.to_string(),
    }
}

/// Currency amount with the configured symbol and fixed decimals.
///
/// ```
/// use budgetgrid_lib::render::{RenderConfig, format_currency};
///
/// let config = RenderConfig::default();
/// assert_eq!(format_currency(-1250.5, &config), "-$1,250.50");
/// ```
pub fn format_currency(value: f64, config: &RenderConfig) -> String {
    match Decimal::from_f64(value) {
        Some(d) => format_currency_decimal(d, config),
        None => value.to_string(),
    }
}

pub fn format_currency_decimal(value: Decimal, config: &RenderConfig) -> String {
    let body = format_decimal(value.abs(), config.currency_decimals, false, config);
    let sign = if is_negative(value, config.currency_decimals) { "-" } else { "" };
    format!("{}{}{}", sign, config.currency_symbol, body)
}

/// Percentage points with one decimal: `12.5` renders as `12.5%`.
pub fn format_percentage(value: f64, config: &RenderConfig) -> String {
    match Decimal::from_f64(value) {
        Some(d) => format!("{}%", format_decimal(d, 1, false, config)),
        None => value.to_string(),
    }
}

/// Round half away from zero to `decimals` places and group thousands.
pub fn format_decimal(value: Decimal, decimals: u32, trim: bool, config: &RenderConfig) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut frac = format!("{:0<width$}", frac_part, width = decimals as usize);
    if trim {
        frac.truncate(frac.trim_end_matches('0').len());
    }

    let mut out = String::new();
    if is_negative(value, decimals) {
        out.push('-');
    }
    out.push_str(&group(int_part, config.thousands_separator));
    if !frac.is_empty() {
        out.push(config.decimal_separator);
        out.push_str(&frac);
    }
    out
}

fn is_negative(value: Decimal, decimals: u32) -> bool {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.is_sign_negative() && !rounded.is_zero()
}

fn group(digits: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return digits.to_string();
    };
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_and_rounding() {
        let config = RenderConfig::default();

        assert_eq!(format_number(0.0, &config), "0");
        assert_eq!(format_number(999.999, &config), "1,000");
        assert_eq!(format_number(1000.0, &config), "1,000");
        assert_eq!(format_number(-0.001, &config), "0");
        assert_eq!(format_currency(0.0, &config), "$0.00");
        assert_eq!(format_currency(1_000_000.0, &config), "$1,000,000.00");
        assert_eq!(format_percentage(42.0, &config), "42.0%");
        assert_eq!(format_percentage(104.25, &config), "104.3%");
    }

    #[test]
    fn test_custom_separators() {
        let config = RenderConfig::default()
            .with_currency("€", 2)
            .with_separators(Some('.'), ',');

        assert_eq!(format_currency(1234.5, &config), "€1.234,50");
        assert_eq!(format_number(1234.5, &config.clone().with_separators(None, '.')), "1234.5");
    }

    #[test]
    fn test_non_finite_falls_back() {
        let config = RenderConfig::default();
        assert_eq!(format_number(f64::NAN, &config), "NaN");
    }
}
