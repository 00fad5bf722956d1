use std::collections::HashSet;
use std::io::Read;

use crate::application::{AppError, Session};
use crate::domain::{
    parse_cents, parse_date, Cents, Currency, EntryId, ExpenseCategory, ExpenseEntry,
    ExpenseType, IncomeEntry, IncomeSource, ParseError, ValidationError,
};
use crate::io::export::{LogRecord, SessionSnapshot};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "line {} ({}): {}", self.line, field, self.error),
            None => write!(f, "line {}: {}", self.line, self.error),
        }
    }
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Parse and validate every row without touching the ledger.
    pub dry_run: bool,
    /// Count rows whose id is already in the ledger as skipped, not as errors.
    pub skip_duplicates: bool,
}

/// A row that passed parsing, ready to append.
enum ParsedEntry {
    Income(IncomeEntry),
    Expense(ExpenseEntry),
}

impl ParsedEntry {
    fn id(&self) -> EntryId {
        match self {
            ParsedEntry::Income(e) => e.id,
            ParsedEntry::Expense(e) => e.id,
        }
    }

    fn amount_cents(&self) -> Cents {
        match self {
            ParsedEntry::Income(e) => e.amount_cents,
            ParsedEntry::Expense(e) => e.amount_cents,
        }
    }
}

/// Importer for loading record logs into a session ledger
pub struct Importer<'a> {
    session: &'a mut Session,
    /// Ids a dry run has accepted so far; they stand in for appended entries.
    staged: HashSet<EntryId>,
}

impl<'a> Importer<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            staged: HashSet::new(),
        }
    }

    /// Import entries from a CSV record log
    pub fn import_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut result = ImportResult::default();
        self.staged.clear();

        for (line_num, row) in csv_reader.deserialize::<LogRecord>().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match row {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let entry = match parse_record(record) {
                Ok(entry) => entry,
                Err((field, e)) => {
                    result.errors.push(ImportError {
                        line,
                        field: Some(field.to_string()),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            self.apply(entry, line, &options, &mut result);
        }

        tracing::info!(
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            "record log imported"
        );
        Ok(result)
    }

    /// Import entries from a JSON snapshot written by `Exporter::export_json`
    pub fn import_json<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult, AppError> {
        let snapshot: SessionSnapshot = serde_json::from_reader(reader)?;
        let mut result = ImportResult::default();
        self.staged.clear();

        let income = snapshot.income.into_iter().map(ParsedEntry::Income);
        let expenses = snapshot.expenses.into_iter().map(ParsedEntry::Expense);
        for (index, entry) in income.chain(expenses).enumerate() {
            self.apply(entry, index + 1, &options, &mut result);
        }

        tracing::info!(
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            "snapshot imported"
        );
        Ok(result)
    }

    fn apply(
        &mut self,
        entry: ParsedEntry,
        line: usize,
        options: &ImportOptions,
        result: &mut ImportResult,
    ) {
        let id = entry.id();
        let known = self.session.ledger().contains(id) || self.staged.contains(&id);
        if options.skip_duplicates && known {
            result.skipped += 1;
            return;
        }

        // A dry run performs the same checks as an append, counting ids it
        // has already accepted as if they were in the ledger.
        let outcome = if options.dry_run {
            self.check_staged(&entry)
        } else {
            match entry {
                ParsedEntry::Income(e) => self.session.append_income(e),
                ParsedEntry::Expense(e) => self.session.append_expense(e),
            }
        };

        match outcome {
            Ok(()) => result.imported += 1,
            Err(e) => result.errors.push(ImportError {
                line,
                field: Some(rejected_field(&e).to_string()),
                error: e.to_string(),
            }),
        }
    }

    fn check_staged(&mut self, entry: &ParsedEntry) -> Result<(), ValidationError> {
        let id = entry.id();
        self.session.ledger().check_append(id, entry.amount_cents())?;
        if !self.staged.insert(id) {
            return Err(ValidationError::DuplicateEntry(id));
        }
        Ok(())
    }
}

/// Record log column a rejected entry is blamed on.
fn rejected_field(error: &ValidationError) -> &'static str {
    match error {
        ValidationError::NonPositiveAmount(_) | ValidationError::AmountTooLarge(_) => "amount",
        ValidationError::DuplicateEntry(_) => "id",
    }
}

fn parse_record(record: LogRecord) -> Result<ParsedEntry, (&'static str, ParseError)> {
    let amount_cents = parse_cents(&record.amount).map_err(|e| ("amount", e))?;
    let date = parse_date(&record.date).map_err(|e| ("date", e))?;
    let currency = Currency::parse(&record.currency).map_err(|e| ("currency", e))?;
    let notes = Some(record.notes);

    let entry = match record.kind.to_lowercase().as_str() {
        "income" => {
            let source = IncomeSource::from_label(&record.label);
            ParsedEntry::Income(
                IncomeEntry::new(amount_cents, date, source, currency).with_notes(notes),
            )
        }
        "expense" => {
            let category = ExpenseCategory::from_label(&record.label);
            let expense_type =
                ExpenseType::parse(&record.expense_type).map_err(|e| ("type", e))?;
            ParsedEntry::Expense(
                ExpenseEntry::new(amount_cents, date, category, expense_type, currency)
                    .with_notes(notes),
            )
        }
        other => return Err(("kind", ParseError::Kind(other.to_string()))),
    };

    // Rows without an id keep the fresh one assigned above.
    Ok(match (entry, record.id) {
        (ParsedEntry::Income(e), Some(id)) => ParsedEntry::Income(e.with_id(id)),
        (ParsedEntry::Expense(e), Some(id)) => ParsedEntry::Expense(e.with_id(id)),
        (entry, None) => entry,
    })
}
