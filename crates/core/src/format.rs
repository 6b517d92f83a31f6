//! Locale number rendering: dot groups thousands, comma starts decimals.

const MARKER: char = '\u{1}';

/// Format `value` with `decimals` fraction digits, e.g. `11.404.852,00000`.
///
/// Zero and non-finite values render as `"0"`.
pub fn format_locale(value: f64, decimals: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut conventional = with_thousands(int_part);
    if let Some(frac) = frac_part {
        conventional.push('.');
        conventional.push_str(frac);
    }

    conventional
        .replace(',', &MARKER.to_string())
        .replace('.', ",")
        .replace(MARKER, ".")
}

/// Group digits with `,` every three places.
fn with_thousands(input: &str) -> String {
    let (sign, digits) = match input.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", input),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let grouped: String = out.chars().rev().collect();
    format!("{sign}{grouped}")
}
