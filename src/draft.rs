//! Order draft: the mutable state a settlement is evaluated from.

use crate::bonus::cap_discount;
use crate::calculator::{compute_breakdown, subtotal, OrderBreakdown};
use crate::error::{Result, SettlementError};
use crate::line_item::{LineItem, OrderLines};
use crate::money::Money;
use crate::order::{DateGate, OrderStatus};
use crate::rates::ExchangeRates;
use crate::reconciler::{reconcile, SettlementResult};
use crate::tender::Tender;

/// Lines, discount and payments recorded for one order.
///
/// The draft carries the exchange rates its foreign tenders are accepted
/// and settled at.
///
/// # Invariants
///
/// - Once `status` is terminal, every mutation is rejected
/// - Subtotal, requested discount and total received (converted at
///   `rates`) are all representable, so settling never overflows
/// - Settlement figures are derived on demand, never stored
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Order identifier.
    pub order: u32,

    rates: ExchangeRates,

    lines: OrderLines,

    /// Requested bonus discount, before capping.
    discount: Money,

    /// Remaining loyalty bonus. When known, the discount is capped by it.
    bonus_remaining: Option<Money>,

    tenders: Vec<Tender>,

    /// Running base-currency sum of `tenders`.
    received: Money,

    status: OrderStatus,
}

impl OrderDraft {
    /// Creates an empty in-progress draft settled at `rates`.
    pub fn new(order: u32, rates: ExchangeRates) -> Self {
        OrderDraft {
            order,
            rates,
            lines: OrderLines::new(),
            discount: Money::ZERO,
            bonus_remaining: None,
            tenders: Vec::new(),
            received: Money::ZERO,
            status: OrderStatus::InProgress,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &OrderLines {
        &self.lines
    }

    pub fn tenders(&self) -> &[Tender] {
        &self.tenders
    }

    /// Adds a line. Returns `Ok(false)` if the order is closed.
    pub fn add_line(&mut self, item: LineItem) -> Result<bool> {
        if self.is_closed() {
            return Ok(false);
        }
        self.lines.add(item)?;
        Ok(true)
    }

    /// Adds to the requested discount. Returns `Ok(false)` if the order is
    /// closed.
    pub fn add_discount(&mut self, amount: Money) -> Result<bool> {
        if self.is_closed() {
            return Ok(false);
        }
        self.discount = self.discount.checked_add(amount).ok_or_else(|| {
            SettlementError::invalid_input(format!(
                "discount {} + {} is out of range",
                self.discount, amount
            ))
        })?;
        Ok(true)
    }

    /// Records the customer's remaining bonus balance.
    pub fn set_bonus_remaining(&mut self, amount: Money) -> bool {
        if self.is_closed() {
            return false;
        }
        self.bonus_remaining = Some(amount);
        true
    }

    /// Records a payment. Returns `Ok(false)` if the order is closed.
    ///
    /// Rejects a tender whose converted amount, or the running total with
    /// it, is out of range.
    pub fn add_tender(&mut self, tender: Tender) -> Result<bool> {
        if self.is_closed() {
            return Ok(false);
        }

        let converted = match tender.kind.currency() {
            Some(currency) => tender.amount.checked_convert(self.rates.rate(currency)),
            None => Some(tender.amount),
        };
        let received = converted
            .and_then(|amount| self.received.checked_add(amount))
            .ok_or_else(|| {
                SettlementError::invalid_input(format!(
                    "{} payment of {} is out of range",
                    tender.kind, tender.amount
                ))
            })?;

        self.tenders.push(tender);
        self.received = received;
        Ok(true)
    }

    /// Discount after the bonus-balance cap, if a balance is known.
    fn capped_discount(&self) -> Money {
        match self.bonus_remaining {
            Some(bonus) => cap_discount(self.discount, bonus, subtotal(self.lines.items())),
            None => self.discount,
        }
    }

    pub fn breakdown(&self) -> OrderBreakdown {
        compute_breakdown(self.lines.items(), self.capped_discount())
    }

    pub fn settle(&self) -> SettlementResult {
        reconcile(self.breakdown().total, &self.tenders, &self.rates)
    }

    /// Moves the order to `Completed` if settlement and the date gate allow.
    pub fn complete(&mut self, gate: DateGate) -> Result<()> {
        let settlement = self.settle();
        self.status = self.status.complete(&settlement, gate)?;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.status = self.status.cancel()?;
        Ok(())
    }
}
