//! Order status lifecycle.
//!
//! ```text
//! IN_PROGRESS --complete (can_finalize && date gate open)--> COMPLETED
//! IN_PROGRESS --cancel-----------------------------------> CANCELLED
//! ```
//!
//! `COMPLETED` and `CANCELLED` are terminal.

use crate::error::{Result, SettlementError};
use crate::reconciler::SettlementResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

/// Whether the order's scheduled delivery/return date has been reached.
/// Supplied by the order-lifecycle caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGate {
    Open,
    Closed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Completes an in-progress order.
    ///
    /// Fails with `InvalidTransition` from a terminal state and with
    /// `SettlementBlocked` when payment or the date gate does not allow it.
    pub fn complete(self, settlement: &SettlementResult, gate: DateGate) -> Result<OrderStatus> {
        self.ensure_in_progress(OrderStatus::Completed)?;

        if let Some(reason) = settlement.blocking_reason() {
            return Err(SettlementError::SettlementBlocked {
                reason: reason.to_string(),
            });
        }
        if gate == DateGate::Closed {
            return Err(SettlementError::SettlementBlocked {
                reason: "scheduled date not reached".to_string(),
            });
        }

        Ok(OrderStatus::Completed)
    }

    /// Cancels an in-progress order.
    pub fn cancel(self) -> Result<OrderStatus> {
        self.ensure_in_progress(OrderStatus::Cancelled)?;
        Ok(OrderStatus::Cancelled)
    }

    fn ensure_in_progress(self, to: OrderStatus) -> Result<()> {
        if self != OrderStatus::InProgress {
            return Err(SettlementError::InvalidTransition {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::rates::ExchangeRates;
    use crate::reconciler::reconcile;
    use crate::tender::Tender;

    fn settle(total: u32, paid: u32) -> SettlementResult {
        let tenders = if paid == 0 {
            vec![]
        } else {
            vec![Tender::cash(Money::from(paid))]
        };
        reconcile(Money::from(total), &tenders, &ExchangeRates::DEFAULT)
    }

    #[test]
    fn test_complete_when_paid_and_due() {
        let status = OrderStatus::InProgress
            .complete(&settle(100, 100), DateGate::Open)
            .unwrap();
        assert_eq!(status, OrderStatus::Completed);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_complete_blocked_by_date_gate() {
        let err = OrderStatus::InProgress
            .complete(&settle(100, 100), DateGate::Closed)
            .unwrap_err();
        assert!(matches!(err, SettlementError::SettlementBlocked { .. }));
    }

    #[test]
    fn test_complete_blocked_without_payment() {
        let err = OrderStatus::InProgress
            .complete(&settle(100, 0), DateGate::Open)
            .unwrap_err();
        assert_eq!(err.to_string(), "Settlement blocked: no payment received");
    }

    #[test]
    fn test_complete_blocked_by_overpayment() {
        assert!(OrderStatus::InProgress
            .complete(&settle(100, 150), DateGate::Open)
            .is_err());
    }

    #[test]
    fn test_partial_payment_may_complete() {
        assert_eq!(
            OrderStatus::InProgress
                .complete(&settle(100, 40), DateGate::Open)
                .unwrap(),
            OrderStatus::Completed
        );
    }

    #[test]
    fn test_cancel_is_unconditional_while_in_progress() {
        assert_eq!(OrderStatus::InProgress.cancel().unwrap(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(matches!(
                status.cancel(),
                Err(SettlementError::InvalidTransition { .. })
            ));
            assert!(matches!(
                status.complete(&settle(100, 100), DateGate::Open),
                Err(SettlementError::InvalidTransition { .. })
            ));
        }
    }
}
