mod common;

use anyhow::Result;
use clap::Parser;
use common::{test_session, Scenario};
use pocketbook::application::{ExpenseGrouping, Session, SessionConfig};
use pocketbook::cli::{
    import_file, run_report_command, Cli, Commands, OutputFormat, ReportCommand, Shell,
};
use pocketbook::domain::Currency;
use pocketbook::io::ImportOptions;
use tempfile::TempDir;

fn report(session: &Session, cmd: ReportCommand) -> Result<String> {
    let mut out = Vec::new();
    run_report_command(session, cmd, 20, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_parse_one_shot_report() {
    let cli = Cli::try_parse_from([
        "pocketbook",
        "--load",
        "jan.csv",
        "-l",
        "feb.csv",
        "--group-by",
        "type",
        "breakdown",
        "EUR",
        "--format",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.load, ["jan.csv", "feb.csv"]);
    assert_eq!(cli.group_by.as_deref(), Some("type"));
    assert!(matches!(
        cli.command,
        Some(Commands::Report(ReportCommand::Breakdown {
            currency: Some(ref c),
            by: None,
            format: OutputFormat::Json,
        })) if c == "EUR"
    ));
}

#[test]
fn test_no_command_means_shell() {
    let cli = Cli::try_parse_from(["pocketbook", "--currency", "EUR"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.default_currency.as_deref(), Some("EUR"));
}

#[test]
fn test_capture_commands_are_shell_only() {
    assert!(Cli::try_parse_from(["pocketbook", "income", "100"]).is_err());
}

#[test]
fn test_summary_table_shows_every_currency() -> Result<()> {
    let mut session = test_session();
    Scenario::basic(&mut session)?;

    let text = report(
        &session,
        ReportCommand::Summary {
            currency: None,
            format: OutputFormat::Table,
        },
    )?;

    let eur = text.find("Currency: EUR").unwrap();
    let usd = text.find("Currency: USD").unwrap();
    assert!(eur < usd);
    assert!(text.contains("1,000.00"));
    assert!(text.contains("-50.00"));
    assert!(text.contains("Expenses by category:"));
    assert!(text.contains("Income by month:"));
    assert!(text.contains("2024-01"));
    Ok(())
}

#[test]
fn test_summary_for_absent_currency_is_zero() -> Result<()> {
    let session = test_session();
    let text = report(
        &session,
        ReportCommand::Summary {
            currency: Some("gbp".into()),
            format: OutputFormat::Csv,
        },
    )?;
    assert_eq!(text, "currency,total_income,total_expense,balance\nGBP,0,0,0\n");
    Ok(())
}

#[test]
fn test_reports_use_session_defaults() -> Result<()> {
    let mut session = Session::new(SessionConfig {
        grouping: ExpenseGrouping::Type,
        default_currency: Currency::Eur,
    });
    Scenario::basic(&mut session)?;

    let text = report(
        &session,
        ReportCommand::Breakdown {
            currency: None,
            by: None,
            format: OutputFormat::Csv,
        },
    )?;
    assert_eq!(text, "type,total\nNeed,5000\n");

    let text = report(
        &session,
        ReportCommand::Breakdown {
            currency: Some("USD".into()),
            by: Some("category".into()),
            format: OutputFormat::Csv,
        },
    )?;
    assert_eq!(text, "category,total\nFood,20000\n");

    assert!(report(
        &session,
        ReportCommand::Monthly {
            currency: Some("CHF".into()),
            format: OutputFormat::Table,
        },
    )
    .is_err());
    Ok(())
}

#[test]
fn test_shell_session_export_and_reload() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("session.csv");
    let path_str = path.to_str().unwrap();

    let script = format!(
        "income 1000 -c USD -s Salary -d 2024-01-15\n\
         expense 200 -c USD -k Food -t Need -d 2024-01-16 -n \"weekly shop\"\n\
         expense 50 -c EUR -k Transport -t Need -d 2024-01-17\n\
         export -o {}\n\
         quit\n\
         income 999\n",
        path_str
    );

    let mut shell = Shell::new(test_session(), 20);
    let mut out = Vec::new();
    shell.run(script.as_bytes(), &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("Exported 3 entries"));
    // Lines after `quit` are never executed.
    assert_eq!(shell.session().ledger().len(), 3);

    let mut reloaded = test_session();
    let result = import_file(&mut reloaded, path_str, ImportOptions::default())?;
    assert_eq!(result.imported, 3);
    assert_eq!(reloaded.summarize(Currency::Usd).balance, 80000);
    assert_eq!(
        reloaded.ledger().all_expenses()[0].notes.as_deref(),
        Some("weekly shop")
    );
    Ok(())
}
