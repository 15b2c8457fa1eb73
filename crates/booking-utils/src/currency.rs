//! Philippine peso formatting for price labels.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol prefixed to every amount.
pub const PESO: &str = "₱";

/// Format an amount the way the `en-PH` locale renders PHP: peso sign,
/// comma thousands separators, exactly two decimals.
///
/// ```
/// use booking_utils::currency::format_php;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_php(Decimal::new(123450, 2)), "₱1,234.50");
/// ```
pub fn format_php(amount: Decimal) -> String {
    let mut value = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    value.rescale(2);
    let digits = value.to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let sign = if amount.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{PESO}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
