//! Rupee rendering for quotation screens and the printable document.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as Indian Rupees: two decimal places, `₹` prefix and
/// lakh/crore digit grouping (`₹12,34,567.89`).
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let magnitude = format!("{:.2}", rounded.abs());

    let (rupees, paise) = magnitude.split_once('.').unwrap_or((magnitude.as_str(), "00"));
    let grouped = group_indian(rupees);

    if negative {
        format!("-₹{grouped}.{paise}")
    } else {
        format!("₹{grouped}.{paise}")
    }
}

/// Indian grouping: the last three digits form one group, everything above
/// groups in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let mut groups = vec![&digits[digits.len() - 3..]];
    let mut rest = &digits[..digits.len() - 3];
    while rest.len() > 2 {
        groups.push(&rest[rest.len() - 2..]);
        rest = &rest[..rest.len() - 2];
    }
    if !rest.is_empty() {
        groups.push(rest);
    }

    groups.reverse();
    groups.join(",")
}
