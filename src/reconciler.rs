//! Payment reconciliation against an order total.
//!
//! [`reconcile`] is a pure function of its inputs: tender amounts are not
//! sanitized here and a zero exchange rate simply converts to zero. Input
//! checks live in the constructors of [`Tender`] and
//! [`ExchangeRates`](crate::rates::ExchangeRates).

use crate::money::Money;
use crate::rates::ExchangeRates;
use crate::tender::{Tender, TenderKind};

/// Outcome of matching tendered payments against an order total.
///
/// # Invariants
///
/// - `remaining == max(0, order_total - total_received)`
/// - `is_overpaid` implies `order_total > 0`
/// - `can_finalize == !is_overpaid && !is_zero_payment`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementResult {
    pub order_total: Money,
    /// Sum of all tenders in base currency.
    pub total_received: Money,
    pub remaining: Money,
    pub is_overpaid: bool,
    pub is_zero_payment: bool,
    /// Whether the order may be finalized on payment grounds.
    pub can_finalize: bool,
}

impl SettlementResult {
    /// Human-readable reason finalization is refused, if it is.
    pub fn blocking_reason(&self) -> Option<&'static str> {
        if self.is_zero_payment {
            Some("no payment received")
        } else if self.is_overpaid {
            Some("payment exceeds order total")
        } else {
            None
        }
    }
}

/// Converts a tender into base currency.
pub fn to_base_currency(tender: &Tender, rates: &ExchangeRates) -> Money {
    match tender.kind.currency() {
        Some(currency) => tender.amount.convert(rates.rate(currency)),
        None => tender.amount,
    }
}

/// Matches tenders against `order_total`.
///
/// # Panics
///
/// If the converted tender sum exceeds the `Decimal` range. Amounts taken
/// from input are range-checked by
/// [`OrderDraft::add_tender`](crate::draft::OrderDraft::add_tender).
pub fn reconcile(order_total: Money, tenders: &[Tender], rates: &ExchangeRates) -> SettlementResult {
    let total_received: Money = tenders.iter().map(|t| to_base_currency(t, rates)).sum();

    let remaining = (order_total - total_received).max(Money::ZERO);
    let is_overpaid = total_received > order_total && order_total > Money::ZERO;
    let is_zero_payment = total_received.is_zero();

    SettlementResult {
        order_total,
        total_received,
        remaining,
        is_overpaid,
        is_zero_payment,
        can_finalize: !is_overpaid && !is_zero_payment,
    }
}

/// Base-currency amount received per instrument, in [`TenderKind::ALL`]
/// order, omitting instruments with no tenders.
pub fn received_by_kind(tenders: &[Tender], rates: &ExchangeRates) -> Vec<(TenderKind, Money)> {
    TenderKind::ALL
        .iter()
        .filter_map(|&kind| {
            let mut matching = tenders.iter().filter(|t| t.kind == kind).peekable();
            matching.peek()?;
            Some((kind, matching.map(|t| to_base_currency(t, rates)).sum()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn tender(kind: TenderKind, amount: &str) -> Tender {
        Tender::new(kind, money(amount)).unwrap()
    }

    #[test]
    fn test_duplicate_instruments_are_summed() {
        let tenders = [tender(TenderKind::Cash, "40"), tender(TenderKind::Cash, "30")];
        let result = reconcile(money("100"), &tenders, &ExchangeRates::DEFAULT);

        assert_eq!(result.total_received, money("70"));
        assert_eq!(result.remaining, money("30"));
        assert!(result.can_finalize);
    }

    #[test]
    fn test_foreign_tender_is_converted() {
        let result = reconcile(
            money("100"),
            &[tender(TenderKind::Usd, "1")],
            &ExchangeRates::DEFAULT,
        );
        assert_eq!(result.total_received, money("12810"));
        assert!(result.is_overpaid);
    }

    #[test]
    fn test_mixed_instruments() {
        let tenders = [
            tender(TenderKind::Card, "1000"),
            tender(TenderKind::Terminal, "500"),
            tender(TenderKind::BankTransfer, "250"),
            tender(TenderKind::Eur, "2"),
        ];
        let result = reconcile(money("40000"), &tenders, &ExchangeRates::DEFAULT);

        assert_eq!(result.total_received, money("30370"));
        assert_eq!(result.remaining, money("9630"));
        assert!(!result.is_overpaid);
    }

    #[test]
    fn test_exact_payment_can_finalize() {
        let result = reconcile(money("100"), &[Tender::cash(money("100"))], &ExchangeRates::DEFAULT);
        assert!(result.remaining.is_zero());
        assert!(result.can_finalize);
        assert_eq!(result.blocking_reason(), None);
    }

    #[test]
    fn test_overpayment_blocks_finalize() {
        let result = reconcile(money("100"), &[Tender::cash(money("150"))], &ExchangeRates::DEFAULT);
        assert!(result.is_overpaid);
        assert!(!result.can_finalize);
        assert_eq!(result.blocking_reason(), Some("payment exceeds order total"));
    }

    #[test]
    fn test_zero_total_is_never_overpaid() {
        let result = reconcile(Money::ZERO, &[Tender::cash(money("5"))], &ExchangeRates::DEFAULT);
        assert!(!result.is_overpaid);
        assert!(result.can_finalize);
    }

    #[test]
    fn test_zero_rate_converts_to_zero() {
        let rates = ExchangeRates {
            usd: Decimal::ZERO,
            eur: Decimal::from(14310),
        };
        let result = reconcile(money("100"), &[tender(TenderKind::Usd, "10")], &rates);

        assert!(result.total_received.is_zero());
        assert!(result.is_zero_payment);
        assert!(!result.can_finalize);
    }

    #[test]
    fn test_received_by_kind_groups_and_orders() {
        let tenders = [
            tender(TenderKind::Usd, "1"),
            tender(TenderKind::Cash, "10"),
            tender(TenderKind::Cash, "5"),
        ];
        let summary = received_by_kind(&tenders, &ExchangeRates::DEFAULT);

        assert_eq!(
            summary,
            vec![
                (TenderKind::Cash, money("15")),
                (TenderKind::Usd, money("12810")),
            ]
        );
    }
}
