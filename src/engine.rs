//! Batch settlement engine.
//!
//! Streams order sheet rows in order, builds one draft per order and writes
//! the settlement of every order once the input is exhausted.

use crate::draft::OrderDraft;
use crate::error::Result;
use crate::rates::ExchangeRates;
use crate::record::{ParsedRow, RowAction, SheetRecord};
use crate::money::Money;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Write};

const OUTPUT_HEADER: [&str; 10] = [
    "order",
    "subtotal",
    "discount",
    "total",
    "received",
    "remaining",
    "overpaid",
    "zero_payment",
    "can_finalize",
    "status",
];

/// One line of the settlement report.
#[derive(Debug, Serialize)]
struct SettlementRow {
    order: u32,
    subtotal: Money,
    discount: Money,
    total: Money,
    received: Money,
    remaining: Money,
    overpaid: bool,
    zero_payment: bool,
    can_finalize: bool,
    status: &'static str,
}

impl SettlementRow {
    fn from_draft(draft: &OrderDraft) -> Self {
        let breakdown = draft.breakdown();
        let settlement = draft.settle();
        SettlementRow {
            order: draft.order,
            subtotal: breakdown.subtotal,
            discount: breakdown.discount,
            total: breakdown.total,
            received: settlement.total_received,
            remaining: settlement.remaining,
            overpaid: settlement.is_overpaid,
            zero_payment: settlement.is_zero_payment,
            can_finalize: settlement.can_finalize,
            status: draft.status().as_str(),
        }
    }
}

/// The order settlement engine.
///
/// Holds the order drafts seen so far and the exchange rates every
/// settlement is evaluated with.
///
/// # Output Ordering
///
/// Settlements are output sorted by order ID in ascending order.
pub struct SettlementEngine {
    rates: ExchangeRates,

    /// Order drafts indexed by order ID.
    orders: HashMap<u32, OrderDraft>,
}

impl SettlementEngine {
    /// Creates an empty engine that converts foreign tenders at `rates`.
    pub fn new(rates: ExchangeRates) -> Self {
        SettlementEngine {
            rates,
            orders: HashMap::new(),
        }
    }

    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Processes order sheet rows from a CSV reader in streaming fashion.
    ///
    /// Invalid rows and refused status changes are logged at warn level and
    /// skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<SheetRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse(row_num) {
                    Ok(row) => {
                        if let Err(e) = self.process_row(row, row_num) {
                            warn!("Row {}: {}", row_num, e);
                        }
                    }
                    Err(e) => warn!("Row {}: {}", row_num, e),
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Applies a single parsed row to its order.
    fn process_row(&mut self, row: ParsedRow, row_num: usize) -> Result<()> {
        let order = row.order;
        let rates = self.rates;
        let draft = self
            .orders
            .entry(order)
            .or_insert_with(|| OrderDraft::new(order, rates));

        if draft.is_closed() {
            debug!(
                "Row {}: Ignoring row for {} order {}",
                row_num,
                draft.status(),
                order
            );
            return Ok(());
        }

        match row.action {
            RowAction::Item(item) => {
                debug!(
                    "Row {}: Order {} line {} x {}",
                    row_num,
                    order,
                    item.unit_price(),
                    item.quantity()
                );
                draft.add_line(item)?;
            }
            RowAction::Discount(amount) => {
                draft.add_discount(amount)?;
                debug!("Row {}: Order {} discount +{}", row_num, order, amount);
            }
            RowAction::Bonus(amount) => {
                draft.set_bonus_remaining(amount);
                debug!("Row {}: Order {} bonus balance {}", row_num, order, amount);
            }
            RowAction::Payment(tender) => {
                draft.add_tender(tender)?;
                debug!(
                    "Row {}: Order {} received {} {}",
                    row_num, order, tender.amount, tender.kind
                );
            }
            RowAction::Complete(gate) => {
                draft.complete(gate)?;
                debug!("Row {}: Order {} completed", row_num, order);
            }
            RowAction::Cancel => {
                draft.cancel()?;
                debug!("Row {}: Order {} cancelled", row_num, order);
            }
        }

        Ok(())
    }

    /// Writes the settlement of every order to CSV.
    ///
    /// Output is sorted by order ID. Money is formatted with 4 decimal places.
    /// The header is written even when there are no orders.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        csv_writer.write_record(OUTPUT_HEADER)?;

        let mut orders: Vec<_> = self.orders.values().collect();
        orders.sort_by_key(|d| d.order);

        for draft in orders {
            csv_writer.serialize(SettlementRow::from_draft(draft))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Returns a reference to an order draft.
    pub fn get_order(&self, order: u32) -> Option<&OrderDraft> {
        self.orders.get(&order)
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(ExchangeRates::DEFAULT)
    }
}
