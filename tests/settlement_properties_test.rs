//! Settlement rules exercised through the public API.
//!
//! Covers totals, reconciliation and the finalize gate, including the
//! zero-total and zero-rate corner cases.

use order_settlement::{
    compute_order_total, reconcile, subtotal, ExchangeRates, LineItem, Money, SettlementResult,
    Tender, TenderKind,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn money(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

fn item(base: &str, override_price: Option<&str>, qty: u32) -> LineItem {
    LineItem::new(money(base), override_price.map(money), qty).unwrap()
}

fn tender(kind: TenderKind, amount: &str) -> Tender {
    Tender::new(kind, money(amount)).unwrap()
}

fn sample_items() -> Vec<LineItem> {
    vec![
        item("19.99", None, 3),
        item("250", Some("199.95"), 2),
        item("0.01", None, 7),
        item("1200", Some("0"), 1),
        item("333.33", None, 9),
    ]
}

// ==================== ORDER TOTAL ====================

#[test]
fn test_zero_discount_total_equals_sum_of_effective_lines() {
    let items = sample_items();
    let expected: Money = items
        .iter()
        .map(|i| i.override_price().unwrap_or(i.base_price()) * i.quantity())
        .sum();

    assert_eq!(compute_order_total(&items, Money::ZERO), expected);
    assert_eq!(expected, money("3459.91"));
}

#[test]
fn test_total_never_negative() {
    let items = sample_items();
    for discount in ["0", "100", "3459.91", "3459.92", "1000000"] {
        let total = compute_order_total(&items, money(discount));
        assert!(!total.is_negative(), "negative total for discount {}", discount);
    }
    assert!(compute_order_total(&items, money("1000000")).is_zero());
}

#[test]
fn test_rental_scenario() {
    let items = vec![item("50000", None, 2), item("30000", Some("20000"), 1)];

    assert_eq!(subtotal(&items), money("130000"));
    assert_eq!(compute_order_total(&items, money("10000")), money("120000"));
}

#[test]
fn test_explicit_zero_override_differs_from_unset() {
    let free = vec![item("500", Some("0"), 2)];
    let priced = vec![item("500", None, 2)];

    assert!(compute_order_total(&free, Money::ZERO).is_zero());
    assert_eq!(compute_order_total(&priced, Money::ZERO), money("1000"));
}

#[test]
fn test_calls_are_idempotent() {
    let items = sample_items();
    let tenders = [tender(TenderKind::Cash, "1000"), tender(TenderKind::Eur, "0.1")];

    let total_a = compute_order_total(&items, money("50"));
    let total_b = compute_order_total(&items, money("50"));
    assert_eq!(total_a, total_b);

    let first = reconcile(total_a, &tenders, &ExchangeRates::DEFAULT);
    let second = reconcile(total_a, &tenders, &ExchangeRates::DEFAULT);
    assert_eq!(first, second);
}

// ==================== RECONCILIATION ====================

#[test]
fn test_duplicate_cash_tenders_sum() {
    let result = reconcile(
        money("100"),
        &[tender(TenderKind::Cash, "40"), tender(TenderKind::Cash, "30")],
        &ExchangeRates::DEFAULT,
    );
    assert_eq!(result.total_received, money("70"));
}

#[test]
fn test_one_dollar_at_configured_rate() {
    let rates = ExchangeRates::new(Decimal::from(12810), Decimal::from(14310)).unwrap();
    let result = reconcile(money("100"), &[tender(TenderKind::Usd, "1")], &rates);
    assert_eq!(result.total_received, money("12810"));
}

#[test]
fn test_empty_order_without_payment() {
    let result = reconcile(Money::ZERO, &[], &ExchangeRates::DEFAULT);
    assert_eq!(
        result,
        SettlementResult {
            order_total: Money::ZERO,
            total_received: Money::ZERO,
            remaining: Money::ZERO,
            is_overpaid: false,
            is_zero_payment: true,
            can_finalize: false,
        }
    );
}

#[test]
fn test_overpayment_cannot_finalize() {
    let result = reconcile(money("100"), &[tender(TenderKind::Cash, "150")], &ExchangeRates::DEFAULT);
    assert!(result.is_overpaid);
    assert!(!result.can_finalize);
    assert!(result.remaining.is_zero());
}

#[test]
fn test_exact_payment_can_finalize() {
    let result = reconcile(money("100"), &[tender(TenderKind::Cash, "100")], &ExchangeRates::DEFAULT);
    assert!(result.can_finalize);
    assert!(result.remaining.is_zero());
}

#[test]
fn test_fully_discounted_order_still_needs_a_payment_row() {
    let items = vec![item("100", None, 1)];
    let total = compute_order_total(&items, money("100"));
    assert!(total.is_zero());

    let unpaid = reconcile(total, &[], &ExchangeRates::DEFAULT);
    assert!(!unpaid.can_finalize);

    let token = reconcile(total, &[tender(TenderKind::Cash, "1")], &ExchangeRates::DEFAULT);
    assert!(!token.is_overpaid);
    assert!(token.can_finalize);
}

#[test]
fn test_zero_rate_tender_counts_as_nothing() {
    let rates = ExchangeRates {
        usd: Decimal::from(12810),
        eur: Decimal::ZERO,
    };
    let result = reconcile(
        money("100"),
        &[tender(TenderKind::Eur, "50"), tender(TenderKind::Cash, "20")],
        &rates,
    );
    assert_eq!(result.total_received, money("20"));
    assert_eq!(result.remaining, money("80"));
}

#[test]
fn test_remaining_matches_invariant_for_partial_payments() {
    let total = money("1000");
    for paid in ["0", "0.0001", "250", "999.9999", "1000", "1000.0001"] {
        let result = reconcile(total, &[tender(TenderKind::Terminal, paid)], &ExchangeRates::DEFAULT);
        let expected = (total - money(paid)).max(Money::ZERO);
        assert_eq!(result.remaining, expected, "paid {}", paid);
        assert_eq!(result.can_finalize, !result.is_overpaid && !result.is_zero_payment);
    }
}
