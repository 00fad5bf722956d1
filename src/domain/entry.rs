use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Currency, ParseError};

pub type EntryId = Uuid;

/// Where an income entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum IncomeSource {
    Salary,
    Business,
    Investments,
    Other,
    /// Free-text source not covered by the fixed list.
    Custom(String),
}

impl IncomeSource {
    pub const KNOWN: [IncomeSource; 4] = [
        IncomeSource::Salary,
        IncomeSource::Business,
        IncomeSource::Investments,
        IncomeSource::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            IncomeSource::Salary => "Salary",
            IncomeSource::Business => "Business",
            IncomeSource::Investments => "Investments",
            IncomeSource::Other => "Other",
            IncomeSource::Custom(label) => label,
        }
    }

    /// Known labels match case-insensitively; anything else is kept verbatim.
    pub fn from_label(s: &str) -> Self {
        let label = s.trim();
        match label.to_lowercase().as_str() {
            "salary" => IncomeSource::Salary,
            "business" => IncomeSource::Business,
            "investments" => IncomeSource::Investments,
            "other" | "" => IncomeSource::Other,
            _ => IncomeSource::Custom(label.to_string()),
        }
    }
}

impl From<String> for IncomeSource {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<IncomeSource> for String {
    fn from(source: IncomeSource) -> Self {
        source.as_str().to_string()
    }
}

impl std::fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an expense was spent on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Entertainment,
    Other,
    Custom(String),
}

impl ExpenseCategory {
    pub const KNOWN: [ExpenseCategory; 5] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Other => "Other",
            ExpenseCategory::Custom(label) => label,
        }
    }

    pub fn from_label(s: &str) -> Self {
        let label = s.trim();
        match label.to_lowercase().as_str() {
            "food" => ExpenseCategory::Food,
            "transport" => ExpenseCategory::Transport,
            "housing" => ExpenseCategory::Housing,
            "entertainment" => ExpenseCategory::Entertainment,
            "other" | "" => ExpenseCategory::Other,
            _ => ExpenseCategory::Custom(label.to_string()),
        }
    }
}

impl From<String> for ExpenseCategory {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<ExpenseCategory> for String {
    fn from(category: ExpenseCategory) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    /// Essentials: rent, groceries, commuting
    Need,
    /// Discretionary spending
    Want,
    Investment,
    Insurance,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 4] = [
        ExpenseType::Need,
        ExpenseType::Want,
        ExpenseType::Investment,
        ExpenseType::Insurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Need => "Need",
            ExpenseType::Want => "Want",
            ExpenseType::Investment => "Investment",
            ExpenseType::Insurance => "Insurance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "need" => Some(ExpenseType::Need),
            "want" => Some(ExpenseType::Want),
            "investment" => Some(ExpenseType::Investment),
            "insurance" => Some(ExpenseType::Insurance),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::from_str(s).ok_or_else(|| ParseError::ExpenseType(s.to_string()))
    }
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: EntryId,
    pub amount_cents: Cents,
    pub date: NaiveDate,
    pub source: IncomeSource,
    pub currency: Currency,
    pub notes: Option<String>,
}

impl IncomeEntry {
    pub fn new(
        amount_cents: Cents,
        date: NaiveDate,
        source: IncomeSource,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount_cents,
            date,
            source,
            currency,
            notes: None,
        }
    }

    /// Attach notes; blank text is treated as no notes.
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = normalize_notes(notes);
        self
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub amount_cents: Cents,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub expense_type: ExpenseType,
    pub currency: Currency,
    pub notes: Option<String>,
}

impl ExpenseEntry {
    pub fn new(
        amount_cents: Cents,
        date: NaiveDate,
        category: ExpenseCategory,
        expense_type: ExpenseType,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount_cents,
            date,
            category,
            expense_type,
            currency,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = normalize_notes(notes);
        self
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Parse a calendar date in ISO format (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ParseError::Date(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_source_labels() {
        for source in IncomeSource::KNOWN {
            assert_eq!(IncomeSource::from_label(source.as_str()), source);
        }
        assert_eq!(IncomeSource::from_label("SALARY"), IncomeSource::Salary);
        assert_eq!(
            IncomeSource::from_label("  Side gig "),
            IncomeSource::Custom("Side gig".into())
        );
    }

    #[test]
    fn test_expense_category_labels() {
        for category in ExpenseCategory::KNOWN {
            assert_eq!(ExpenseCategory::from_label(category.as_str()), category);
        }
        assert_eq!(
            ExpenseCategory::from_label("Pets"),
            ExpenseCategory::Custom("Pets".into())
        );
        assert_eq!(ExpenseCategory::from_label(""), ExpenseCategory::Other);
    }

    #[test]
    fn test_expense_type_roundtrip() {
        for et in ExpenseType::ALL {
            assert_eq!(ExpenseType::from_str(et.as_str()), Some(et));
        }
        assert!(ExpenseType::parse("luxury").is_err());
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let entry = IncomeEntry::new(100, date, IncomeSource::Salary, Currency::Usd)
            .with_notes(Some("   ".into()));
        assert_eq!(entry.notes, None);

        let entry = entry.with_notes(Some(" bonus ".into()));
        assert_eq!(entry.notes.as_deref(), Some("bonus"));
    }

    #[test]
    fn test_custom_labels_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ExpenseCategory::Custom("Pets".into())).unwrap();
        assert_eq!(json, "\"Pets\"");
        let parsed: IncomeSource = serde_json::from_str("\"business\"").unwrap();
        assert_eq!(parsed, IncomeSource::Business);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }
}
