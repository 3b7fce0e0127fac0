//! Order total calculation.
//!
//! Pure functions over already-validated line items; they cannot fail.

use crate::line_item::LineItem;
use crate::money::Money;

/// Subtotal, applied discount and total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBreakdown {
    /// Σ `unit_price × quantity` before any discount.
    pub subtotal: Money,
    /// Discount actually applied, never more than `subtotal`.
    pub discount: Money,
    /// `subtotal - discount`, never negative.
    pub total: Money,
}

/// Sums `unit_price × quantity` over all lines.
pub fn subtotal(line_items: &[LineItem]) -> Money {
    line_items.iter().map(LineItem::line_total).sum()
}

/// Computes the subtotal, effective discount and total due.
///
/// The discount is clamped to `[0, subtotal]` so the total can never go
/// negative.
pub fn compute_breakdown(line_items: &[LineItem], discount: Money) -> OrderBreakdown {
    let subtotal = subtotal(line_items);
    let discount = discount.max(Money::ZERO).min(subtotal);

    OrderBreakdown {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

/// Authoritative total due for an order.
pub fn compute_order_total(line_items: &[LineItem], discount: Money) -> Money {
    compute_breakdown(line_items, discount).total
}
