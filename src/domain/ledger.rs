use chrono::NaiveDate;

use super::{
    Cents, Currency, EntryId, MAX_AMOUNT_CENTS, ExpenseCategory, ExpenseEntry, ExpenseType, IncomeEntry,
    IncomeSource, ValidationError,
};

/// Append-only store of income and expense entries for one session.
///
/// Entries are kept in insertion order and never change once recorded:
/// there is no update or delete operation.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    income: Vec<IncomeEntry>,
    expenses: Vec<ExpenseEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new income entry. Fails without touching the ledger when the
    /// amount is not positive.
    pub fn record_income(
        &mut self,
        amount_cents: Cents,
        date: NaiveDate,
        source: IncomeSource,
        notes: Option<String>,
        currency: Currency,
    ) -> Result<(), ValidationError> {
        let entry = IncomeEntry::new(amount_cents, date, source, currency).with_notes(notes);
        self.append_income(entry)
    }

    /// Record a new expense entry. Same contract as [`Ledger::record_income`].
    pub fn record_expense(
        &mut self,
        amount_cents: Cents,
        date: NaiveDate,
        category: ExpenseCategory,
        expense_type: ExpenseType,
        notes: Option<String>,
        currency: Currency,
    ) -> Result<(), ValidationError> {
        let entry = ExpenseEntry::new(amount_cents, date, category, expense_type, currency)
            .with_notes(notes);
        self.append_expense(entry)
    }

    /// Append an already-built income entry, e.g. one read from a record log.
    pub fn append_income(&mut self, entry: IncomeEntry) -> Result<(), ValidationError> {
        self.check_append(entry.id, entry.amount_cents)?;
        self.income.push(entry);
        Ok(())
    }

    pub fn append_expense(&mut self, entry: ExpenseEntry) -> Result<(), ValidationError> {
        self.check_append(entry.id, entry.amount_cents)?;
        self.expenses.push(entry);
        Ok(())
    }

    /// The checks an append performs, without appending: the amount must be
    /// within `1..=MAX_AMOUNT_CENTS` and the id must be new.
    pub fn check_append(&self, id: EntryId, amount_cents: Cents) -> Result<(), ValidationError> {
        validate_amount(amount_cents)?;
        if self.contains(id) {
            return Err(ValidationError::DuplicateEntry(id));
        }
        Ok(())
    }

    pub fn all_income(&self) -> &[IncomeEntry] {
        &self.income
    }

    pub fn all_expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    /// Whether an entry with this id has already been recorded, in either sequence.
    pub fn contains(&self, id: EntryId) -> bool {
        self.income.iter().any(|e| e.id == id) || self.expenses.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.income.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }
}

fn validate_amount(amount_cents: Cents) -> Result<(), ValidationError> {
    if amount_cents <= 0 {
        return Err(ValidationError::NonPositiveAmount(amount_cents));
    }
    if amount_cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::AmountTooLarge(amount_cents));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert!(ledger.all_income().is_empty());
        assert!(ledger.all_expenses().is_empty());
    }

    #[test]
    fn test_record_income_appends() {
        let mut ledger = Ledger::new();
        for amount in [1, 250, 100000] {
            let before = ledger.all_income().len();
            ledger
                .record_income(
                    amount,
                    day(2024, 1, 1),
                    IncomeSource::Salary,
                    None,
                    Currency::Usd,
                )
                .unwrap();
            assert_eq!(ledger.all_income().len(), before + 1);
            assert_eq!(ledger.all_income().last().unwrap().amount_cents, amount);
        }
    }

    #[test]
    fn test_record_income_rejects_non_positive() {
        let mut ledger = Ledger::new();
        for amount in [0, -1, -5000] {
            let result = ledger.record_income(
                amount,
                day(2024, 1, 1),
                IncomeSource::Other,
                None,
                Currency::Eur,
            );
            assert_eq!(result, Err(ValidationError::NonPositiveAmount(amount)));
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_expense_rejects_non_positive() {
        let mut ledger = Ledger::new();
        let result = ledger.record_expense(
            0,
            day(2024, 1, 1),
            ExpenseCategory::Food,
            ExpenseType::Need,
            None,
            Currency::Usd,
        );
        assert!(matches!(result, Err(ValidationError::NonPositiveAmount(0))));
        assert!(ledger.all_expenses().is_empty());
    }

    #[test]
    fn test_record_rejects_amount_above_maximum() {
        let mut ledger = Ledger::new();
        ledger
            .record_income(
                MAX_AMOUNT_CENTS,
                day(2024, 1, 1),
                IncomeSource::Salary,
                None,
                Currency::Usd,
            )
            .unwrap();
        let result = ledger.record_income(
            MAX_AMOUNT_CENTS + 1,
            day(2024, 1, 1),
            IncomeSource::Salary,
            None,
            Currency::Usd,
        );
        assert_eq!(result, Err(ValidationError::AmountTooLarge(MAX_AMOUNT_CENTS + 1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut ledger = Ledger::new();
        ledger
            .record_expense(
                300,
                day(2024, 5, 1),
                ExpenseCategory::Housing,
                ExpenseType::Need,
                Some("rent".into()),
                Currency::Gbp,
            )
            .unwrap();
        ledger
            .record_expense(
                100,
                day(2024, 1, 1),
                ExpenseCategory::Food,
                ExpenseType::Want,
                None,
                Currency::Gbp,
            )
            .unwrap();

        let amounts: Vec<Cents> = ledger.all_expenses().iter().map(|e| e.amount_cents).collect();
        assert_eq!(amounts, [300, 100]);
        assert_eq!(ledger.all_expenses()[0].notes.as_deref(), Some("rent"));
    }

    #[test]
    fn test_append_rejects_duplicate_ids() {
        let mut ledger = Ledger::new();
        let entry = IncomeEntry::new(500, day(2024, 2, 2), IncomeSource::Business, Currency::Inr);
        let id = entry.id;

        ledger.append_income(entry.clone()).unwrap();
        assert_eq!(ledger.check_append(id, 500), Err(ValidationError::DuplicateEntry(id)));
        assert_eq!(
            ledger.append_income(entry).unwrap_err(),
            ValidationError::DuplicateEntry(id)
        );

        // Ids are unique across both sequences.
        let expense = ExpenseEntry::new(
            10,
            day(2024, 2, 2),
            ExpenseCategory::Other,
            ExpenseType::Want,
            Currency::Inr,
        )
        .with_id(id);
        assert!(ledger.append_expense(expense).is_err());
        assert_eq!(ledger.len(), 1);
    }
}
