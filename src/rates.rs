//! Operator-adjustable exchange rates and where they come from.
//!
//! The reconciler takes rates as a plain value. Callers obtain that value
//! from an [`ExchangeRateProvider`]: either fixed in memory or loaded from a
//! [`RateStore`] file that survives restarts.

use crate::error::{Result, SettlementError};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Foreign currencies accepted as tender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
        }
    }
}

impl FromStr for Currency {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            _ => Err(SettlementError::UnknownCurrency(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base-currency units per one foreign unit.
///
/// Fields are public so callers can hold whatever the operator entered;
/// [`ExchangeRates::new`] and [`ExchangeRates::validate`] enforce `rate > 0`
/// at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRates {
    pub usd: Decimal,
    pub eur: Decimal,
}

impl ExchangeRates {
    /// Rates used until an operator adjusts them.
    pub const DEFAULT: ExchangeRates = ExchangeRates {
        usd: Decimal::from_parts(12810, 0, 0, false, 0),
        eur: Decimal::from_parts(14310, 0, 0, false, 0),
    };

    /// Creates a rate table, rejecting non-positive rates.
    pub fn new(usd: Decimal, eur: Decimal) -> Result<Self> {
        let rates = ExchangeRates { usd, eur };
        rates.validate()?;
        Ok(rates)
    }

    pub fn rate(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
        }
    }

    /// Returns a copy with one rate replaced, rejecting non-positive rates.
    pub fn with_rate(&self, currency: Currency, rate: Decimal) -> Result<Self> {
        check_rate(currency, rate)?;
        let mut updated = *self;
        match currency {
            Currency::Usd => updated.usd = rate,
            Currency::Eur => updated.eur = rate,
        }
        Ok(updated)
    }

    /// Checks that every rate is strictly positive.
    pub fn validate(&self) -> Result<()> {
        check_rate(Currency::Usd, self.usd)?;
        check_rate(Currency::Eur, self.eur)
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_rate(currency: Currency, rate: Decimal) -> Result<()> {
    if rate <= Decimal::ZERO {
        return Err(SettlementError::invalid_input(format!(
            "{} rate must be positive, got {}",
            currency, rate
        )));
    }
    Ok(())
}

/// Source of the exchange rates in effect for a settlement.
pub trait ExchangeRateProvider {
    fn current_rates(&self) -> Result<ExchangeRates>;
}

/// Rates held in memory, for tests and one-off evaluations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRates(pub ExchangeRates);

impl ExchangeRateProvider for FixedRates {
    fn current_rates(&self) -> Result<ExchangeRates> {
        Ok(self.0)
    }
}

/// One row of the rate file.
#[derive(Debug, Serialize, Deserialize)]
struct RateRecord {
    currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    rate: Decimal,
}

/// Exchange rates persisted in a `currency,rate` CSV file.
///
/// A missing file means the operator never adjusted anything and
/// [`ExchangeRates::DEFAULT`] applies. Currencies absent from the file keep
/// their default rate.
#[derive(Debug, Clone)]
pub struct RateStore {
    path: PathBuf,
}

impl RateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored rates.
    pub fn load(&self) -> Result<ExchangeRates> {
        if !self.path.exists() {
            debug!(
                "Rate file {} not found, using default rates",
                self.path.display()
            );
            return Ok(ExchangeRates::DEFAULT);
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)?;

        let mut rates = ExchangeRates::DEFAULT;
        for result in reader.deserialize::<RateRecord>() {
            let record = result?;
            let currency = Currency::from_str(&record.currency)?;
            rates = rates.with_rate(currency, record.rate)?;
        }

        info!(
            "Loaded exchange rates from {}: usd={} eur={}",
            self.path.display(),
            rates.usd,
            rates.eur
        );
        Ok(rates)
    }

    /// Writes the full rate table to the file.
    ///
    /// The table goes to a sibling `.tmp` file first and is renamed over
    /// the old one, so an interrupted save leaves the previous rates intact.
    pub fn save(&self, rates: &ExchangeRates) -> Result<()> {
        rates.validate()?;

        let tmp_path = self.tmp_path();
        if let Err(e) = self.write_table(&tmp_path, rates) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            warn!(
                "Failed to move {} into place: {}",
                tmp_path.display(),
                e
            );
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        info!("Saved exchange rates to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_table(&self, path: &Path, rates: &ExchangeRates) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for currency in [Currency::Usd, Currency::Eur] {
            writer.serialize(RateRecord {
                currency: currency.to_string(),
                rate: rates.rate(currency),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Adjusts one rate and persists the result.
    pub fn set_rate(&self, currency: Currency, rate: Decimal) -> Result<ExchangeRates> {
        let updated = self.load()?.with_rate(currency, rate)?;
        self.save(&updated)?;
        Ok(updated)
    }
}

impl ExchangeRateProvider for RateStore {
    fn current_rates(&self) -> Result<ExchangeRates> {
        self.load()
    }
}
