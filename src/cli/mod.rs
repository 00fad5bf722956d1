use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::application::{ExpenseGrouping, Session};
use crate::domain::{
    parse_cents, parse_date, Currency, ExpenseCategory, ExpenseType, IncomeSource,
};
use crate::io::{Exporter, ImportOptions, Importer};
use crate::settings::Settings;

mod render;
mod shell;

pub use shell::Shell;

/// Pocketbook - multi-currency income and expense tracker
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "Record income and expenses and summarize them per currency")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Record log to load into the session at start-up (repeatable)
    #[arg(short, long = "load", global = true)]
    pub load: Vec<String>,

    /// Field the expense breakdown groups on: category, type
    #[arg(long, global = true)]
    pub group_by: Option<String>,

    /// Currency used when a command does not name one
    #[arg(long = "currency", global = true)]
    pub default_currency: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (the default)
    Shell,

    #[command(flatten)]
    Report(ReportCommand),
}

/// Read-only commands, available one-shot and inside the shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ReportCommand {
    /// Totals and charts for one currency, or every currency if omitted
    Summary {
        /// Currency code (e.g., USD, EUR)
        currency: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the currencies that have entries
    Currencies,

    /// Expense totals per category or type
    Breakdown {
        /// Currency code (defaults to the session currency)
        currency: Option<String>,

        /// Group on: category, type (defaults to the configured grouping)
        #[arg(long)]
        by: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Income totals per calendar month
    Monthly {
        /// Currency code (defaults to the session currency)
        currency: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List recorded entries
    List {
        #[arg(value_enum)]
        kind: EntryKind,
    },

    /// Export the ledger as a record log
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv record log or json snapshot
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

/// Commands that change the session ledger; only meaningful inside the shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CaptureCommand {
    /// Record an income entry
    Income {
        /// Amount (e.g., "1000" or "1000.00")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Currency code (defaults to the session currency)
        #[arg(short, long)]
        currency: Option<String>,

        /// Source: Salary, Business, Investments, Other, or any text
        #[arg(short, long, default_value = "Salary")]
        source: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Record an expense entry
    Expense {
        /// Amount (e.g., "12.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Currency code (defaults to the session currency)
        #[arg(short, long)]
        currency: Option<String>,

        /// Category: Food, Transport, Housing, Entertainment, Other, or any text
        #[arg(short = 'k', long, default_value = "Other")]
        category: String,

        /// Type: need, want, investment, insurance
        #[arg(short = 't', long = "type", default_value = "need")]
        expense_type: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Load a record log (csv) or snapshot (json) into the session
    Import {
        /// Input file
        input: String,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,

        /// Skip entries already in the ledger
        #[arg(long)]
        skip_duplicates: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expenses,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut settings =
            Settings::load(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(group_by) = self.group_by {
            settings.group_by = group_by;
        }
        if let Some(currency) = self.default_currency {
            settings.default_currency = currency;
        }
        if self.verbose {
            settings.log_level = "debug".to_string();
        }

        init_tracing(&settings.log_level);

        let mut session = Session::new(settings.session_config()?);
        for path in &self.load {
            let result = import_file(&mut session, path, ImportOptions::default())
                .with_context(|| format!("Failed to load {}", path))?;
            for error in &result.errors {
                eprintln!("{}: {}", path, error);
            }
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.command.unwrap_or(Commands::Shell) {
            Commands::Shell => {
                let stdin = io::stdin();
                let mut shell = Shell::new(session, settings.chart_width);
                shell.run(stdin.lock(), &mut out)?;
            }
            Commands::Report(cmd) => {
                run_report_command(&session, cmd, settings.chart_width, &mut out)?;
            }
        }
        Ok(())
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pocketbook={level}")));
    // A subscriber installed by an embedding binary wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Import a file into the session, picking the format from its extension.
pub fn import_file(
    session: &mut Session,
    path: &str,
    options: ImportOptions,
) -> Result<crate::io::ImportResult> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path))?;
    let reader = BufReader::new(file);
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut importer = Importer::new(session);
    let result = if is_json {
        importer.import_json(reader, options)?
    } else {
        importer.import_csv(reader, options)?
    };
    Ok(result)
}

pub fn run_report_command(
    session: &Session,
    cmd: ReportCommand,
    chart_width: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let default_currency = session.config().default_currency;
    let resolve = |currency: Option<String>| -> Result<Currency> {
        match currency {
            Some(code) => Ok(Currency::parse(&code)?),
            None => Ok(default_currency),
        }
    };

    match cmd {
        ReportCommand::Summary { currency, format } => {
            let views = match currency {
                Some(code) => vec![session.currency_dashboard(Currency::parse(&code)?)],
                None => session.dashboard(),
            };
            render::dashboard(out, &views, format, chart_width)?;
        }
        ReportCommand::Currencies => {
            let currencies = session.currencies_present();
            if currencies.is_empty() {
                writeln!(out, "No entries recorded.")?;
            }
            for currency in currencies {
                writeln!(out, "{}", currency)?;
            }
        }
        ReportCommand::Breakdown {
            currency,
            by,
            format,
        } => {
            let currency = resolve(currency)?;
            let grouping = match by {
                Some(by) => ExpenseGrouping::parse(&by)?,
                None => session.config().grouping,
            };
            let breakdown = session.expense_breakdown_by(currency, grouping);
            render::breakdown(out, currency, grouping, &breakdown, format, chart_width)?;
        }
        ReportCommand::Monthly { currency, format } => {
            let currency = resolve(currency)?;
            let months = session.income_by_month(currency);
            render::monthly(out, currency, &months, format, chart_width)?;
        }
        ReportCommand::List { kind } => match kind {
            EntryKind::Income => render::income_list(out, session.ledger().all_income())?,
            EntryKind::Expenses => render::expense_list(out, session.ledger().all_expenses())?,
        },
        ReportCommand::Export { output, format } => {
            let exporter = Exporter::new(session);
            match output {
                Some(path) => {
                    let file =
                        File::create(&path).with_context(|| format!("Cannot create {}", path))?;
                    let count = match format {
                        ExportFormat::Csv => exporter.export_csv(file)?,
                        ExportFormat::Json => {
                            let snapshot = exporter.export_json(file)?;
                            snapshot.income.len() + snapshot.expenses.len()
                        }
                    };
                    writeln!(out, "Exported {} entries to {}", count, path)?;
                }
                None => match format {
                    ExportFormat::Csv => {
                        exporter.export_csv(&mut *out)?;
                    }
                    ExportFormat::Json => {
                        exporter.export_json(&mut *out)?;
                        writeln!(out)?;
                    }
                },
            }
        }
    }
    Ok(())
}

pub fn run_capture_command(
    session: &mut Session,
    cmd: CaptureCommand,
    out: &mut dyn Write,
) -> Result<()> {
    let default_currency = session.config().default_currency;
    let resolve_currency = |currency: Option<String>| -> Result<Currency> {
        match currency {
            Some(code) => Ok(Currency::parse(&code)?),
            None => Ok(default_currency),
        }
    };

    match cmd {
        CaptureCommand::Income {
            amount,
            currency,
            source,
            date,
            notes,
        } => {
            let amount_cents = parse_cents(&amount)?;
            let currency = resolve_currency(currency)?;
            let date = resolve_date(date)?;
            session.record_income(
                amount_cents,
                date,
                IncomeSource::from_label(&source),
                notes,
                currency,
            )?;
            writeln!(out, "Income added in {}!", currency)?;
        }
        CaptureCommand::Expense {
            amount,
            currency,
            category,
            expense_type,
            date,
            notes,
        } => {
            let amount_cents = parse_cents(&amount)?;
            let currency = resolve_currency(currency)?;
            let expense_type = ExpenseType::parse(&expense_type)?;
            let date = resolve_date(date)?;
            session.record_expense(
                amount_cents,
                date,
                ExpenseCategory::from_label(&category),
                expense_type,
                notes,
                currency,
            )?;
            writeln!(out, "Expense added in {}!", currency)?;
        }
        CaptureCommand::Import {
            input,
            dry_run,
            skip_duplicates,
        } => {
            let options = ImportOptions {
                dry_run,
                skip_duplicates,
            };
            let result = import_file(session, &input, options)?;

            if dry_run {
                writeln!(out, "Dry run: {} entries would be imported", result.imported)?;
            } else {
                writeln!(out, "Imported {} entries", result.imported)?;
            }
            if result.skipped > 0 {
                writeln!(out, "Skipped {} duplicates", result.skipped)?;
            }
            if !result.errors.is_empty() {
                writeln!(out, "{} errors:", result.errors.len())?;
                for error in &result.errors {
                    writeln!(out, "  {}", error)?;
                }
            }
        }
    }
    Ok(())
}

fn resolve_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_date(&s)?),
        None => Ok(Local::now().date_naive()),
    }
}
