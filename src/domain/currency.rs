use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// Currency code tagging every entry. Entries in different currencies are
/// summarized independently; no conversion is ever performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Inr,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    /// Every supported code, in the order the capture forms offer them.
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Inr,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "INR" => Some(Currency::Inr),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            "JPY" => Some(Currency::Jpy),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::from_str(s).ok_or_else(|| ParseError::Currency(s.to_string()))
    }
}

// Currencies sort by code, not by declaration order.
impl Ord for Currency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Currency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
