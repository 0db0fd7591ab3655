//! Currency formatting for jackpot amounts.

/// Format `amount` as whole pounds sterling, e.g. `1234567.4` becomes `£1,234,567`.
///
/// Rounding is half away from zero and only affects the returned string.
pub fn format_gbp(amount: f64) -> String {
    if amount.is_nan() {
        return "£NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount < 0.0 { "-£∞" } else { "£∞" }.to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if rounded < 0.0 {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
