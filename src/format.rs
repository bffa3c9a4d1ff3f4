//! Display formatting for prices, market caps and percentages.
//!
//! All functions are pure. Trailing fractional zeros are always stripped, so
//! `1.50` renders as `1.5` and `2.00` as `2`. Negative amounts put the sign in
//! front of the currency symbol (`-$1,234.5`). Non-finite input renders `N/A`.

const NOT_AVAILABLE: &str = "N/A";

/// `value` with at most `digits` fraction digits, trailing zeros removed.
fn fixed(value: f64, digits: usize) -> String {
    let s = format!("{:.*}", digits, value);
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(int_part: &str) -> String {
    let bytes = int_part.as_bytes();
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// en-US style grouping: `1234567.891` -> `1,234,567.89` for `max_frac = 2`.
fn grouped(value: f64, max_frac: usize) -> String {
    let s = fixed(value, max_frac);
    match s.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_thousands(int_part), frac),
        None => group_thousands(&s),
    }
}

fn signed(prefix: &str, body: String, negative: bool) -> String {
    if negative && body != "0" {
        format!("-{prefix}{body}")
    } else {
        format!("{prefix}{body}")
    }
}

fn plain_amount(abs: f64) -> String {
    if abs < 0.01 {
        fixed(abs, 8)
    } else if abs < 1.0 {
        fixed(abs, 4)
    } else {
        grouped(abs, 2)
    }
}

/// Currency rendering of a coin price.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if price == 0.0 {
        return "$0".to_string();
    }
    signed("$", plain_amount(price.abs()), price < 0.0)
}

/// Same rule as [`format_price`] without the currency symbol.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    signed("", plain_amount(value.abs()), value < 0.0)
}

const TIERS: [(f64, &str); 5] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Scaled amount with its suffix. A value that rounds up to 1000 in its
/// tier is shown in the next tier instead (`999_999_999` is `1B`, not `1000M`).
fn abbreviate(abs: f64) -> String {
    let mut tier = TIERS.iter().rposition(|&(div, _)| abs >= div).unwrap_or(0);

    loop {
        let (div, suffix) = TIERS[tier];
        let scaled = fixed(abs / div, 2);
        let rolled_over = scaled.parse::<f64>().is_ok_and(|v| v >= 1000.0);

        if rolled_over && tier + 1 < TIERS.len() {
            tier += 1;
            continue;
        }

        return if tier == 0 {
            grouped(abs, 2)
        } else {
            format!("{scaled}{suffix}")
        };
    }
}

/// Abbreviated currency amount for market caps and volumes: `$1.5B`, `$12.35M`.
pub fn format_market_cap(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    signed("$", abbreviate(value.abs()), value < 0.0)
}

/// Signed percentage: always starts with `+` or `-`. Values that round to
/// zero are `+0%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let body = fixed(value.abs(), 2);
    let sign = if value < 0.0 && body != "0" { '-' } else { '+' };
    format!("{sign}{body}%")
}
