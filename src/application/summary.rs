//! Per-currency aggregation over the ledger.
//!
//! Every function here is a pure, single pass over the current ledger
//! contents. Absent data yields zeros or empty maps, never an error. Totals
//! saturate at `Cents::MAX` instead of overflowing.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Cents, Currency, ExpenseEntry, IncomeEntry, Ledger};

use super::{CurrencyDashboard, CurrencySummary, ExpenseGrouping, YearMonth};

/// Distinct currencies across income and expenses, sorted by code.
pub fn currencies_present(ledger: &Ledger) -> Vec<Currency> {
    let income = ledger.all_income().iter().map(|e| e.currency);
    let expenses = ledger.all_expenses().iter().map(|e| e.currency);
    income
        .chain(expenses)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Total income, total expense and balance for one currency.
pub fn summarize(ledger: &Ledger, currency: Currency) -> CurrencySummary {
    let total_income = income_in(ledger, currency)
        .map(|e| e.amount_cents)
        .fold(0, Cents::saturating_add);
    let total_expense = expenses_in(ledger, currency)
        .map(|e| e.amount_cents)
        .fold(0, Cents::saturating_add);
    CurrencySummary::new(currency, total_income, total_expense)
}

/// Expense totals per group label for one currency.
pub fn expense_breakdown(
    ledger: &Ledger,
    currency: Currency,
    grouping: ExpenseGrouping,
) -> BTreeMap<String, Cents> {
    let mut groups: BTreeMap<String, Cents> = BTreeMap::new();
    for expense in expenses_in(ledger, currency) {
        let label = grouping.label_of(expense);
        match groups.get_mut(label) {
            Some(total) => *total = total.saturating_add(expense.amount_cents),
            None => {
                groups.insert(label.to_string(), expense.amount_cents);
            }
        }
    }
    groups
}

/// Income totals per calendar month for one currency, oldest month first.
pub fn income_by_month(ledger: &Ledger, currency: Currency) -> BTreeMap<YearMonth, Cents> {
    let mut months: BTreeMap<YearMonth, Cents> = BTreeMap::new();
    for income in income_in(ledger, currency) {
        let total = months.entry(YearMonth::of(income.date)).or_insert(0);
        *total = total.saturating_add(income.amount_cents);
    }
    months
}

/// Summary plus both chart series for one currency.
pub fn currency_dashboard(
    ledger: &Ledger,
    currency: Currency,
    grouping: ExpenseGrouping,
) -> CurrencyDashboard {
    CurrencyDashboard {
        summary: summarize(ledger, currency),
        grouping,
        expense_breakdown: expense_breakdown(ledger, currency, grouping),
        income_by_month: income_by_month(ledger, currency),
    }
}

/// Dashboard of every currency present in the ledger.
pub fn dashboard(ledger: &Ledger, grouping: ExpenseGrouping) -> Vec<CurrencyDashboard> {
    currencies_present(ledger)
        .into_iter()
        .map(|currency| currency_dashboard(ledger, currency, grouping))
        .collect()
}

fn income_in(ledger: &Ledger, currency: Currency) -> impl Iterator<Item = &IncomeEntry> {
    ledger
        .all_income()
        .iter()
        .filter(move |e| e.currency == currency)
}

fn expenses_in(ledger: &Ledger, currency: Currency) -> impl Iterator<Item = &ExpenseEntry> {
    ledger
        .all_expenses()
        .iter()
        .filter(move |e| e.currency == currency)
}
