use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;

use crate::application::{CurrencyDashboard, ExpenseGrouping, YearMonth};
use crate::domain::{format_cents, format_grouped, Cents, Currency, ExpenseEntry, IncomeEntry};

use super::OutputFormat;

const BAR: char = '#';

pub fn dashboard(
    out: &mut dyn Write,
    views: &[CurrencyDashboard],
    format: OutputFormat,
    width: usize,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, views)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "currency,total_income,total_expense,balance")?;
            for view in views {
                let s = &view.summary;
                writeln!(
                    out,
                    "{},{},{},{}",
                    s.currency, s.total_income, s.total_expense, s.balance
                )?;
            }
        }
        OutputFormat::Table => {
            if views.is_empty() {
                writeln!(
                    out,
                    "No data yet. Add income or expenses to see your dashboard."
                )?;
                return Ok(());
            }

            for (i, view) in views.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                let s = &view.summary;
                writeln!(out, "Currency: {}", s.currency)?;
                writeln!(out, "{}", "=".repeat(44))?;
                writeln!(out, "  Total Income:  {}", money(s.currency, s.total_income))?;
                writeln!(out, "  Total Expense: {}", money(s.currency, s.total_expense))?;
                writeln!(out, "  Balance:       {}", money(s.currency, s.balance))?;

                if !view.expense_breakdown.is_empty() {
                    writeln!(out)?;
                    writeln!(out, "Expenses by {}:", view.grouping)?;
                    breakdown_rows(out, &view.expense_breakdown, width)?;
                }
                if !view.income_by_month.is_empty() {
                    writeln!(out)?;
                    writeln!(out, "Income by month:")?;
                    monthly_rows(out, &view.income_by_month, width)?;
                }
            }
        }
    }
    Ok(())
}

pub fn breakdown(
    out: &mut dyn Write,
    currency: Currency,
    grouping: ExpenseGrouping,
    groups: &BTreeMap<String, Cents>,
    format: OutputFormat,
    width: usize,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, groups)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "{},total", grouping)?;
            for (label, total) in groups {
                writeln!(out, "{},{}", label, total)?;
            }
        }
        OutputFormat::Table => {
            if groups.is_empty() {
                writeln!(out, "No expenses recorded in {}.", currency)?;
                return Ok(());
            }
            writeln!(out, "Expenses by {} ({})", grouping, currency)?;
            writeln!(out)?;
            breakdown_rows(out, groups, width)?;
            writeln!(out, "{}", "-".repeat(36))?;
            let total: Cents = groups.values().sum();
            writeln!(out, "{:<20} {:>15}", "TOTAL", format_grouped(total))?;
        }
    }
    Ok(())
}

pub fn monthly(
    out: &mut dyn Write,
    currency: Currency,
    months: &BTreeMap<YearMonth, Cents>,
    format: OutputFormat,
    width: usize,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, months)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "month,total")?;
            for (month, total) in months {
                writeln!(out, "{},{}", month, total)?;
            }
        }
        OutputFormat::Table => {
            if months.is_empty() {
                writeln!(out, "No income recorded in {}.", currency)?;
                return Ok(());
            }
            writeln!(out, "Income by month ({})", currency)?;
            writeln!(out)?;
            monthly_rows(out, months, width)?;
        }
    }
    Ok(())
}

pub fn income_list(out: &mut dyn Write, entries: &[IncomeEntry]) -> Result<()> {
    if entries.is_empty() {
        writeln!(out, "No income recorded.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<12} {:>12} {:<8} {:<15} NOTES",
        "DATE", "AMOUNT", "CURRENCY", "SOURCE"
    )?;
    writeln!(out, "{}", "-".repeat(70))?;
    for entry in entries {
        writeln!(
            out,
            "{:<12} {:>12} {:<8} {:<15} {}",
            entry.date.format("%Y-%m-%d"),
            format_cents(entry.amount_cents),
            entry.currency,
            truncate(entry.source.as_str(), 15),
            truncate(entry.notes.as_deref().unwrap_or(""), 30)
        )?;
    }
    Ok(())
}

pub fn expense_list(out: &mut dyn Write, entries: &[ExpenseEntry]) -> Result<()> {
    if entries.is_empty() {
        writeln!(out, "No expenses recorded.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<12} {:>12} {:<8} {:<15} {:<10} NOTES",
        "DATE", "AMOUNT", "CURRENCY", "CATEGORY", "TYPE"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;
    for entry in entries {
        writeln!(
            out,
            "{:<12} {:>12} {:<8} {:<15} {:<10} {}",
            entry.date.format("%Y-%m-%d"),
            format_cents(entry.amount_cents),
            entry.currency,
            truncate(entry.category.as_str(), 15),
            entry.expense_type,
            truncate(entry.notes.as_deref().unwrap_or(""), 30)
        )?;
    }
    Ok(())
}

fn breakdown_rows(
    out: &mut dyn Write,
    groups: &BTreeMap<String, Cents>,
    width: usize,
) -> Result<()> {
    let max = groups.values().copied().max().unwrap_or(0);
    // Largest group first, the order a bar chart reads best in.
    let mut rows: Vec<(&String, &Cents)> = groups.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (label, total) in rows {
        writeln!(
            out,
            "{:<20} {:>15}  {}",
            truncate(label, 20),
            format_grouped(*total),
            bar(*total, max, width)
        )?;
    }
    Ok(())
}

fn monthly_rows(
    out: &mut dyn Write,
    months: &BTreeMap<YearMonth, Cents>,
    width: usize,
) -> Result<()> {
    let max = months.values().copied().max().unwrap_or(0);
    for (month, total) in months {
        writeln!(
            out,
            "{:<20} {:>15}  {}",
            month.to_string(),
            format_grouped(*total),
            bar(*total, max, width)
        )?;
    }
    Ok(())
}

fn money(currency: Currency, cents: Cents) -> String {
    format!("{} {:>15}", currency, format_grouped(cents))
}

/// A bar of at most `width` characters, proportional to `value / max`.
/// Any positive value gets at least one character.
pub(crate) fn bar(value: Cents, max: Cents, width: usize) -> String {
    if value <= 0 || max <= 0 || width == 0 {
        return String::new();
    }
    let scaled = (i128::from(value) * width as i128 + i128::from(max) - 1) / i128::from(max);
    let len = usize::try_from(scaled).unwrap_or(width).clamp(1, width);
    BAR.to_string().repeat(len)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
