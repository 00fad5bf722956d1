use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{
    Cents, Currency, ExpenseCategory, ExpenseEntry, ExpenseType, IncomeEntry, IncomeSource,
    Ledger, ValidationError,
};

use super::{summary, AppError, CurrencyDashboard, CurrencySummary, ExpenseGrouping, YearMonth};

/// Per-session settings that shape how summaries are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Field the expense chart groups on.
    pub grouping: ExpenseGrouping,
    /// Currency used when a command does not name one.
    pub default_currency: Currency,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grouping: ExpenseGrouping::Category,
            default_currency: Currency::Usd,
        }
    }
}

/// A single user's session: one exclusively owned ledger plus its settings.
/// This is the primary interface for any front end (CLI shell, one-shot
/// reports, tests).
#[derive(Debug, Default)]
pub struct Session {
    ledger: Ledger,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            ledger: Ledger::new(),
            config,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ========================
    // Entry capture
    // ========================

    /// Record an income entry. On failure the ledger is unchanged.
    pub fn record_income(
        &mut self,
        amount_cents: Cents,
        date: NaiveDate,
        source: IncomeSource,
        notes: Option<String>,
        currency: Currency,
    ) -> Result<(), AppError> {
        let result = self
            .ledger
            .record_income(amount_cents, date, source.clone(), notes, currency);
        log_capture("income", amount_cents, currency, source.as_str(), &result);
        Ok(result?)
    }

    /// Record an expense entry. On failure the ledger is unchanged.
    pub fn record_expense(
        &mut self,
        amount_cents: Cents,
        date: NaiveDate,
        category: ExpenseCategory,
        expense_type: ExpenseType,
        notes: Option<String>,
        currency: Currency,
    ) -> Result<(), AppError> {
        let result = self.ledger.record_expense(
            amount_cents,
            date,
            category.clone(),
            expense_type,
            notes,
            currency,
        );
        log_capture("expense", amount_cents, currency, category.as_str(), &result);
        Ok(result?)
    }

    /// Append an income entry that already carries its id (record log import).
    pub fn append_income(&mut self, entry: IncomeEntry) -> Result<(), ValidationError> {
        self.ledger.append_income(entry)
    }

    pub fn append_expense(&mut self, entry: ExpenseEntry) -> Result<(), ValidationError> {
        self.ledger.append_expense(entry)
    }

    // ========================
    // Summaries
    // ========================

    pub fn currencies_present(&self) -> Vec<Currency> {
        summary::currencies_present(&self.ledger)
    }

    pub fn summarize(&self, currency: Currency) -> CurrencySummary {
        summary::summarize(&self.ledger, currency)
    }

    /// Expense breakdown grouped on the session's configured field.
    pub fn expense_breakdown(&self, currency: Currency) -> BTreeMap<String, Cents> {
        self.expense_breakdown_by(currency, self.config.grouping)
    }

    pub fn expense_breakdown_by(
        &self,
        currency: Currency,
        grouping: ExpenseGrouping,
    ) -> BTreeMap<String, Cents> {
        summary::expense_breakdown(&self.ledger, currency, grouping)
    }

    pub fn income_by_month(&self, currency: Currency) -> BTreeMap<YearMonth, Cents> {
        summary::income_by_month(&self.ledger, currency)
    }

    pub fn currency_dashboard(&self, currency: Currency) -> CurrencyDashboard {
        summary::currency_dashboard(&self.ledger, currency, self.config.grouping)
    }

    pub fn dashboard(&self) -> Vec<CurrencyDashboard> {
        summary::dashboard(&self.ledger, self.config.grouping)
    }
}

fn log_capture(
    kind: &str,
    amount_cents: Cents,
    currency: Currency,
    label: &str,
    result: &Result<(), ValidationError>,
) {
    match result {
        Ok(()) => tracing::debug!(kind, amount_cents, %currency, label, "entry recorded"),
        Err(err) => tracing::warn!(kind, amount_cents, %currency, label, "entry rejected: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_entry_leaves_session_unchanged() {
        let mut session = Session::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = session
            .record_income(0, date, IncomeSource::Salary, None, Currency::Usd)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::NonPositiveAmount(0))
        ));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_configured_grouping_drives_breakdown() {
        let mut session = Session::new(SessionConfig {
            grouping: ExpenseGrouping::Type,
            default_currency: Currency::Eur,
        });
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        session
            .record_expense(
                1200,
                date,
                ExpenseCategory::Entertainment,
                ExpenseType::Want,
                None,
                Currency::Eur,
            )
            .unwrap();

        let breakdown = session.expense_breakdown(Currency::Eur);
        assert_eq!(breakdown.get("Want"), Some(&1200));
        assert_eq!(
            session
                .expense_breakdown_by(Currency::Eur, ExpenseGrouping::Category)
                .get("Entertainment"),
            Some(&1200)
        );
    }
}
