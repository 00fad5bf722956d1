use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{AppError, Session};
use crate::domain::{format_cents, EntryId, ExpenseEntry, IncomeEntry};

/// Header of the CSV record log.
pub const RECORD_LOG_HEADER: [&str; 8] = [
    "kind", "id", "date", "amount", "currency", "label", "type", "notes",
];

/// One line of the record log. `label` carries the income source or the
/// expense category; `type` is empty for income lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub kind: String,
    #[serde(default)]
    pub id: Option<EntryId>,
    pub date: String,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub expense_type: String,
    #[serde(default)]
    pub notes: String,
}

impl From<&IncomeEntry> for LogRecord {
    fn from(entry: &IncomeEntry) -> Self {
        Self {
            kind: "income".to_string(),
            id: Some(entry.id),
            date: entry.date.format("%Y-%m-%d").to_string(),
            amount: format_cents(entry.amount_cents),
            currency: entry.currency.as_str().to_string(),
            label: entry.source.as_str().to_string(),
            expense_type: String::new(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }
}

impl From<&ExpenseEntry> for LogRecord {
    fn from(entry: &ExpenseEntry) -> Self {
        Self {
            kind: "expense".to_string(),
            id: Some(entry.id),
            date: entry.date.format("%Y-%m-%d").to_string(),
            amount: format_cents(entry.amount_cents),
            currency: entry.currency.as_str().to_string(),
            label: entry.category.as_str().to_string(),
            expense_type: entry.expense_type.as_str().to_string(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }
}

/// Session snapshot for JSON export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub income: Vec<IncomeEntry>,
    pub expenses: Vec<ExpenseEntry>,
}

/// Exporter for writing the session ledger out as a record log
pub struct Exporter<'a> {
    session: &'a Session,
}

impl<'a> Exporter<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Export every entry as CSV: all income lines, then all expense lines.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let ledger = self.session.ledger();
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(RECORD_LOG_HEADER)?;

        let income = ledger.all_income().iter().map(LogRecord::from);
        let expenses = ledger.all_expenses().iter().map(LogRecord::from);

        let mut count = 0;
        for record in income.chain(expenses) {
            csv_writer.serialize(record)?;
            count += 1;
        }

        csv_writer.flush()?;
        tracing::info!(count, "record log exported");
        Ok(count)
    }

    /// Export the whole ledger as a JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<SessionSnapshot, AppError> {
        let ledger = self.session.ledger();
        let snapshot = SessionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            income: ledger.all_income().to_vec(),
            expenses: ledger.all_expenses().to_vec(),
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        Ok(snapshot)
    }
}
