//! Payment instruments tendered against an order.

use crate::error::{Result, SettlementError};
use crate::money::Money;
use crate::rates::Currency;
use std::fmt;
use std::str::FromStr;

/// The closed set of supported payment instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TenderKind {
    Cash,
    Card,
    /// Card payment through the POS terminal.
    Terminal,
    BankTransfer,
    /// Amount in US dollars, converted at the configured rate.
    Usd,
    /// Amount in euros, converted at the configured rate.
    Eur,
}

impl TenderKind {
    pub const ALL: [TenderKind; 6] = [
        TenderKind::Cash,
        TenderKind::Card,
        TenderKind::Terminal,
        TenderKind::BankTransfer,
        TenderKind::Usd,
        TenderKind::Eur,
    ];

    /// Foreign currency of this instrument, `None` for base-currency kinds.
    pub fn currency(&self) -> Option<Currency> {
        match self {
            TenderKind::Usd => Some(Currency::Usd),
            TenderKind::Eur => Some(Currency::Eur),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TenderKind::Cash => "cash",
            TenderKind::Card => "card",
            TenderKind::Terminal => "terminal",
            TenderKind::BankTransfer => "bank_transfer",
            TenderKind::Usd => "usd",
            TenderKind::Eur => "eur",
        }
    }
}

impl FromStr for TenderKind {
    type Err = SettlementError;

    /// Parses a tender kind, case-insensitively. Unknown kinds are an error.
    fn from_str(s: &str) -> Result<Self> {
        let kind = s.trim().to_lowercase();
        match kind.as_str() {
            "cash" => Ok(TenderKind::Cash),
            "card" => Ok(TenderKind::Card),
            "terminal" => Ok(TenderKind::Terminal),
            "bank_transfer" | "banktransfer" | "transfer" => Ok(TenderKind::BankTransfer),
            "usd" => Ok(TenderKind::Usd),
            "eur" => Ok(TenderKind::Eur),
            _ => Err(SettlementError::UnknownTenderKind(s.trim().to_string())),
        }
    }
}

impl fmt::Display for TenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single payment entry. For foreign kinds `amount` is in foreign units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tender {
    pub kind: TenderKind,
    pub amount: Money,
}

impl Tender {
    /// Creates a tender, rejecting negative amounts.
    pub fn new(kind: TenderKind, amount: Money) -> Result<Self> {
        if amount.is_negative() {
            return Err(SettlementError::invalid_input(format!(
                "{} amount must be non-negative, got {}",
                kind, amount
            )));
        }
        Ok(Tender { kind, amount })
    }

    #[cfg(test)]
    pub(crate) fn cash(amount: Money) -> Self {
        Tender {
            kind: TenderKind::Cash,
            amount,
        }
    }
}
