// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use pocketbook::application::{Session, SessionConfig};
use pocketbook::domain::{Currency, ExpenseCategory, ExpenseType, IncomeSource};

/// Helper to parse a date string into a NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Helper to create an empty session with default settings
pub fn test_session() -> Session {
    Session::new(SessionConfig::default())
}

/// Test fixture: the three-entry USD/EUR scenario
pub struct Scenario;

impl Scenario {
    /// Income 1000 USD salary, expense 200 USD food, expense 50 EUR transport
    pub fn basic(session: &mut Session) -> Result<()> {
        session.record_income(
            100000,
            date("2024-01-15"),
            IncomeSource::Salary,
            None,
            Currency::Usd,
        )?;
        session.record_expense(
            20000,
            date("2024-01-16"),
            ExpenseCategory::Food,
            ExpenseType::Need,
            None,
            Currency::Usd,
        )?;
        session.record_expense(
            5000,
            date("2024-01-17"),
            ExpenseCategory::Transport,
            ExpenseType::Need,
            None,
            Currency::Eur,
        )?;
        Ok(())
    }

    /// A few months of mixed entries across three currencies
    pub fn quarter(session: &mut Session) -> Result<()> {
        let income = [
            ("2024-01-31", 300000, IncomeSource::Salary, Currency::Usd),
            ("2024-02-29", 300000, IncomeSource::Salary, Currency::Usd),
            ("2024-02-10", 45050, IncomeSource::Business, Currency::Usd),
            ("2024-03-31", 310000, IncomeSource::Salary, Currency::Usd),
            ("2024-03-05", 1250, IncomeSource::Investments, Currency::Eur),
            ("2023-12-24", 20000, IncomeSource::Custom("Gift".into()), Currency::Inr),
        ];
        for (day, amount, source, currency) in income {
            session.record_income(amount, date(day), source, None, currency)?;
        }

        let expenses = [
            ("2024-01-02", 120000, ExpenseCategory::Housing, ExpenseType::Need, Currency::Usd),
            ("2024-01-09", 8599, ExpenseCategory::Food, ExpenseType::Need, Currency::Usd),
            ("2024-02-14", 6500, ExpenseCategory::Entertainment, ExpenseType::Want, Currency::Usd),
            ("2024-02-20", 25000, ExpenseCategory::Other, ExpenseType::Insurance, Currency::Usd),
            ("2024-03-01", 50000, ExpenseCategory::Custom("Index fund".into()), ExpenseType::Investment, Currency::Usd),
            ("2024-03-03", 2375, ExpenseCategory::Food, ExpenseType::Want, Currency::Eur),
        ];
        for (day, amount, category, expense_type, currency) in expenses {
            session.record_expense(amount, date(day), category, expense_type, None, currency)?;
        }
        Ok(())
    }
}
