//! Domain definitions for prediction results.

/// Symbol prefixed to formatted amounts.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Result of a single inference call.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub predicted_salary: f64,
    pub formatted_salary: String,
}

impl Prediction {
    pub fn new(predicted_salary: f64) -> Self {
        Self {
            predicted_salary,
            formatted_salary: format_currency(predicted_salary),
        }
    }
}

/// Format an amount with the currency symbol, comma thousands separators and
/// exactly two decimals, e.g. `1234567.8` becomes `₹1,234,567.80`.
///
/// Negative amounts keep the sign after the symbol (`₹-1,000.00`), even when
/// they round to zero.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("{CURRENCY_SYMBOL}{value}");
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{CURRENCY_SYMBOL}{sign}{grouped}.{frac_part}")
}
