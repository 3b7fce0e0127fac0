//! Order line items and the line collection of an order draft.

use crate::error::{Result, SettlementError};
use crate::money::Money;

/// One product/quantity/price entry within an order.
///
/// # Invariants
///
/// - `base_price` and `override_price` are never negative
/// - `quantity >= 1`; a line is deleted rather than kept at zero
/// - `unit_price × quantity` is representable as [`Money`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    base_price: Money,
    override_price: Option<Money>,
    quantity: u32,
}

impl LineItem {
    /// Creates a line item, rejecting negative prices, zero quantity and a
    /// line total too large to represent.
    pub fn new(base_price: Money, override_price: Option<Money>, quantity: u32) -> Result<Self> {
        if base_price.is_negative() {
            return Err(SettlementError::invalid_input(format!(
                "base price must be non-negative, got {}",
                base_price
            )));
        }
        if let Some(price) = override_price {
            if price.is_negative() {
                return Err(SettlementError::invalid_input(format!(
                    "override price must be non-negative, got {}",
                    price
                )));
            }
        }
        if quantity == 0 {
            return Err(SettlementError::invalid_input("quantity must be at least 1"));
        }

        let item = LineItem {
            base_price,
            override_price,
            quantity,
        };
        item.checked_line_total()?;
        Ok(item)
    }

    /// Catalog price at time of selection.
    pub fn base_price(&self) -> Money {
        self.base_price
    }

    /// Operator-entered replacement price, if any.
    pub fn override_price(&self) -> Option<Money> {
        self.override_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The price used for totaling: the override when set (including an
    /// explicit zero), otherwise the base price.
    pub fn unit_price(&self) -> Money {
        self.override_price.unwrap_or(self.base_price)
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }

    fn checked_line_total(&self) -> Result<Money> {
        self.unit_price()
            .checked_times(self.quantity)
            .ok_or_else(|| {
                SettlementError::invalid_input(format!(
                    "line total {} x {} is out of range",
                    self.unit_price(),
                    self.quantity
                ))
            })
    }
}

/// The editable list of lines on an order draft.
///
/// Quantity edits that reach zero remove the line, so every retained line
/// satisfies the `quantity >= 1` invariant. Edits that would make the
/// subtotal unrepresentable are rejected and leave the lines unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLines {
    items: Vec<LineItem>,
}

impl OrderLines {
    pub fn new() -> Self {
        OrderLines { items: Vec::new() }
    }

    /// Appends a line and returns its index.
    pub fn add(&mut self, item: LineItem) -> Result<usize> {
        self.ensure_subtotal_fits(None, &item)?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Sets the quantity of the line at `index`. A quantity of zero deletes
    /// the line. Returns `Ok(false)` if there is no such line.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<bool> {
        let Some(current) = self.items.get(index) else {
            return Ok(false);
        };

        if quantity == 0 {
            self.items.remove(index);
        } else {
            let candidate = LineItem {
                quantity,
                ..current.clone()
            };
            self.ensure_subtotal_fits(Some(index), &candidate)?;
            self.items[index] = candidate;
        }
        Ok(true)
    }

    /// Decreases the quantity of the line at `index` by one, deleting it
    /// when it reaches zero.
    pub fn decrement(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };

        if item.quantity == 1 {
            self.items.remove(index);
        } else {
            item.quantity -= 1;
        }
        true
    }

    /// Replaces (or clears, with `None`) the override price of a line.
    pub fn set_override(&mut self, index: usize, price: Option<Money>) -> Result<bool> {
        let Some(current) = self.items.get(index) else {
            return Ok(false);
        };
        let candidate = LineItem::new(current.base_price, price, current.quantity)?;
        self.ensure_subtotal_fits(Some(index), &candidate)?;
        self.items[index] = candidate;
        Ok(true)
    }

    /// Checks that the subtotal stays representable with `candidate` added,
    /// or replacing the line at `replace`.
    fn ensure_subtotal_fits(&self, replace: Option<usize>, candidate: &LineItem) -> Result<()> {
        let mut subtotal = candidate.checked_line_total()?;
        for (i, item) in self.items.iter().enumerate() {
            if Some(i) == replace {
                continue;
            }
            subtotal = subtotal.checked_add(item.line_total()).ok_or_else(|| {
                SettlementError::invalid_input("order subtotal is out of range")
            })?;
        }
        Ok(())
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
