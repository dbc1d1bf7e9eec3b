//! Handlebars helpers for the Markdown reports.

use handlebars::handlebars_helper;

handlebars_helper!(thousands: |number: u64| format_thousands(number));

/// Formats a number with comma thousands separators.
pub fn format_thousands(number: u64) -> String {
    let digits = number.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}
