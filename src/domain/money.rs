use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Comparisons against zero tolerate one cent of rounding noise from
/// equal/percentage division.
pub const EPSILON: Decimal = dec!(0.01);

/// An exact split must reconcile with the expense total within this much.
pub const EXACT_SPLIT_TOLERANCE: Decimal = dec!(0.05);

/// Percentage splits must sum to 100 within this many percentage points.
pub const PERCENT_TOLERANCE: Decimal = dec!(0.5);

pub const HUNDRED: Decimal = dec!(100);

/// Round to 2-decimal currency precision (banker's rounding).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// True if the amount is too small to be worth a transfer.
pub fn is_negligible(amount: Decimal) -> bool {
    amount.abs() < EPSILON
}
