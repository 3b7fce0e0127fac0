//! # Order Settlement
//!
//! Computes what a rental or repair order owes and reconciles the payments
//! tendered against it: cash, card, terminal, bank transfer, and US dollar
//! or euro amounts converted at operator-adjustable exchange rates.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Uses 4 decimal places via `rust_decimal`
//! - **Pure kernel**: [`compute_order_total`] and [`reconcile`] have no I/O
//! - **Closed tender set**: unknown payment kinds are rejected at parse time
//! - **Deterministic output**: Orders sorted by order ID
//!
//! ## Example
//!
//! ```
//! use order_settlement::{compute_order_total, reconcile, ExchangeRates, LineItem, Money, Tender, TenderKind};
//!
//! let items = vec![
//!     LineItem::new(Money::from(50000), None, 2).unwrap(),
//!     LineItem::new(Money::from(30000), Some(Money::from(20000)), 1).unwrap(),
//! ];
//! let total = compute_order_total(&items, Money::from(10000));
//! assert_eq!(total, Money::from(120000));
//!
//! let tenders = [Tender::new(TenderKind::Usd, Money::from(10)).unwrap()];
//! let settlement = reconcile(total, &tenders, &ExchangeRates::DEFAULT);
//! assert_eq!(settlement.total_received, Money::from(128100));
//! assert!(settlement.is_overpaid);
//! assert!(!settlement.can_finalize);
//! ```

pub mod bonus;
pub mod calculator;
pub mod draft;
pub mod engine;
pub mod error;
pub mod line_item;
pub mod money;
pub mod order;
pub mod rates;
pub mod reconciler;
pub mod record;
pub mod tender;

pub use bonus::cap_discount;
pub use calculator::{compute_breakdown, compute_order_total, subtotal, OrderBreakdown};
pub use draft::OrderDraft;
pub use engine::SettlementEngine;
pub use error::{Result, SettlementError};
pub use line_item::{LineItem, OrderLines};
pub use money::Money;
pub use order::{DateGate, OrderStatus};
pub use rates::{Currency, ExchangeRateProvider, ExchangeRates, FixedRates, RateStore};
pub use reconciler::{received_by_kind, reconcile, SettlementResult};
pub use record::{ParsedRow, RowAction, SheetRecord};
pub use tender::{Tender, TenderKind};
