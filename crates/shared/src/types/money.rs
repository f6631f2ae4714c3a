//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` throughout; these helpers fix the
//! rounding and display conventions in one place.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance used when comparing report totals (one cent).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to cents, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true when two totals differ by less than one cent.
#[must_use]
pub fn is_balanced(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() < BALANCE_TOLERANCE
}

/// Formats an amount with thousands separators and two decimals.
///
/// `1234567.5` becomes `1,234,567.50`; negatives keep a leading minus.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}.{fraction}")
    } else {
        format!("{grouped}.{fraction}")
    }
}
