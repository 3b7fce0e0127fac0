//! Order sheet records for CSV parsing and their typed form.

use crate::error::{Result, SettlementError};
use crate::line_item::LineItem;
use crate::money::Money;
use crate::order::DateGate;
use crate::tender::{Tender, TenderKind};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Raw order sheet row as read from CSV.
///
/// Columns are optional strings because each row type uses a different
/// subset of them.
#[derive(Debug, Deserialize)]
pub struct SheetRecord {
    /// Row type: item, discount, bonus, payment, complete, cancel
    #[serde(rename = "type")]
    pub row_type: String,

    /// Order ID
    pub order: u32,

    /// Tender kind for payments, `due`/`early` for completions
    pub kind: Option<String>,

    /// Base price, discount, bonus balance or tendered amount
    pub amount: Option<String>,

    /// Override price (items only)
    #[serde(rename = "override")]
    pub override_price: Option<String>,

    /// Quantity (items only)
    pub quantity: Option<String>,
}

impl SheetRecord {
    /// Parses the raw record into a typed row.
    ///
    /// `row` is only used in error messages.
    pub fn parse(&self, row: usize) -> Result<ParsedRow> {
        let row_type = self.row_type.trim().to_lowercase();

        let action = match row_type.as_str() {
            "item" => {
                let base = self.required_money(&self.amount, "amount", row)?;
                let override_price = optional(&self.override_price)
                    .map(|s| parse_money(s, "override", row))
                    .transpose()?;
                let quantity = match optional(&self.quantity) {
                    Some(q) => q.parse::<u32>().map_err(|e| SettlementError::InvalidRecord {
                        row,
                        message: format!("quantity '{}': {}", q, e),
                    })?,
                    None => 1,
                };
                RowAction::Item(LineItem::new(base, override_price, quantity)?)
            }
            "discount" => {
                RowAction::Discount(self.non_negative(&self.amount, "amount", row)?)
            }
            "bonus" => RowAction::Bonus(self.non_negative(&self.amount, "amount", row)?),
            "payment" => {
                let kind = optional(&self.kind).ok_or_else(|| SettlementError::InvalidRecord {
                    row,
                    message: "payment without tender kind".to_string(),
                })?;
                let kind = TenderKind::from_str(kind)?;
                let amount = self.required_money(&self.amount, "amount", row)?;
                RowAction::Payment(Tender::new(kind, amount)?)
            }
            "complete" => {
                let gate = match optional(&self.kind).map(str::to_lowercase).as_deref() {
                    None | Some("due") => DateGate::Open,
                    Some("early") => DateGate::Closed,
                    Some(other) => {
                        return Err(SettlementError::InvalidRecord {
                            row,
                            message: format!("unknown completion kind '{}'", other),
                        })
                    }
                };
                RowAction::Complete(gate)
            }
            "cancel" => RowAction::Cancel,
            other => {
                return Err(SettlementError::InvalidRecord {
                    row,
                    message: format!("unknown row type '{}'", other),
                })
            }
        };

        Ok(ParsedRow {
            order: self.order,
            action,
        })
    }

    fn required_money(&self, field: &Option<String>, name: &str, row: usize) -> Result<Money> {
        let value = optional(field).ok_or_else(|| SettlementError::InvalidRecord {
            row,
            message: format!("missing {}", name),
        })?;
        parse_money(value, name, row)
    }

    fn non_negative(&self, field: &Option<String>, name: &str, row: usize) -> Result<Money> {
        let amount = self.required_money(field, name, row)?;
        if amount.is_negative() {
            return Err(SettlementError::InvalidRecord {
                row,
                message: format!("{} must be non-negative, got {}", name, amount),
            });
        }
        Ok(amount)
    }
}

/// Trimmed field contents, `None` when absent or blank.
fn optional(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parses an amount, rejecting more fractional digits than [`Money::SCALE`]
/// instead of rounding them away.
fn parse_money(value: &str, name: &str, row: usize) -> Result<Money> {
    let decimal = Decimal::from_str(value).map_err(|e| SettlementError::InvalidRecord {
        row,
        message: format!("{} '{}': {}", name, value, e),
    })?;
    if decimal.normalize().scale() > Money::SCALE {
        return Err(SettlementError::InvalidRecord {
            row,
            message: format!(
                "{} '{}' has more than {} decimal places",
                name,
                value,
                Money::SCALE
            ),
        });
    }
    Ok(Money::new(decimal))
}

/// A parsed and validated sheet row ready for processing.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub order: u32,
    pub action: RowAction,
}

/// Row variants with associated data.
#[derive(Debug, Clone)]
pub enum RowAction {
    /// Add a line item to the order.
    Item(LineItem),

    /// Add to the requested bonus discount.
    Discount(Money),

    /// Set the customer's remaining bonus balance.
    Bonus(Money),

    /// Record a tendered payment.
    Payment(Tender),

    /// Request completion with the given date gate.
    Complete(DateGate),

    /// Cancel the order.
    Cancel,
}
