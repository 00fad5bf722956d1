use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Currency, ExpenseEntry, ParseError};

/// Totals for a single currency, derived fresh from the ledger on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySummary {
    pub currency: Currency,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
}

impl CurrencySummary {
    pub fn new(currency: Currency, total_income: Cents, total_expense: Cents) -> Self {
        Self {
            currency,
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// Which expense field labels the groups of an expense breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseGrouping {
    #[default]
    Category,
    Type,
}

impl ExpenseGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseGrouping::Category => "category",
            ExpenseGrouping::Type => "type",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "category" => Some(ExpenseGrouping::Category),
            "type" => Some(ExpenseGrouping::Type),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::from_str(s).ok_or_else(|| ParseError::Grouping(s.to_string()))
    }

    /// The label an expense contributes to under this grouping.
    pub fn label_of<'a>(&self, expense: &'a ExpenseEntry) -> &'a str {
        match self {
            ExpenseGrouping::Category => expense.category.as_str(),
            ExpenseGrouping::Type => expense.expense_type.as_str(),
        }
    }
}

impl std::fmt::Display for ExpenseGrouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar month key for the income time series. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| ParseError::Date(s.clone()))?;
        Ok(Self::of(date))
    }
}

/// Everything the dashboard shows for one currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyDashboard {
    pub summary: CurrencySummary,
    pub grouping: ExpenseGrouping,
    pub expense_breakdown: BTreeMap<String, Cents>,
    pub income_by_month: BTreeMap<YearMonth, Cents>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_is_income_minus_expense() {
        let summary = CurrencySummary::new(Currency::Eur, 0, 5000);
        assert_eq!(summary.balance, -5000);
    }

    #[test]
    fn test_year_month_orders_chronologically() {
        let dec = YearMonth { year: 2023, month: 12 };
        let jan = YearMonth { year: 2024, month: 1 };
        let feb = YearMonth { year: 2024, month: 2 };
        let mut months = vec![feb, dec, jan];
        months.sort();
        assert_eq!(months, [dec, jan, feb]);
    }

    #[test]
    fn test_year_month_string_form() {
        let ym = YearMonth { year: 2024, month: 3 };
        assert_eq!(ym.to_string(), "2024-03");
        assert_eq!(YearMonth::try_from("2024-03".to_string()), Ok(ym));
        assert!(YearMonth::try_from("2024-13".to_string()).is_err());

        let json = serde_json::to_string(&BTreeMap::from([(ym, 100_i64)])).unwrap();
        assert_eq!(json, r#"{"2024-03":100}"#);
    }

    #[test]
    fn test_grouping_parse() {
        assert_eq!(ExpenseGrouping::from_str("Type"), Some(ExpenseGrouping::Type));
        assert_eq!(ExpenseGrouping::default(), ExpenseGrouping::Category);
        assert!(ExpenseGrouping::parse("month").is_err());
    }
}
