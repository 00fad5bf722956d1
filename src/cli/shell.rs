use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::application::Session;

use super::{run_capture_command, run_report_command, CaptureCommand, ReportCommand};

const PROMPT: &str = "pocketbook> ";

/// One line typed into the shell, parsed with the same grammar as the CLI.
#[derive(Parser, Debug)]
#[command(name = "pocketbook", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Capture(CaptureCommand),

    #[command(flatten)]
    Report(ReportCommand),

    /// End the session (the ledger is discarded)
    #[command(alias = "exit")]
    Quit,
}

/// Interactive session: owns the session ledger for the lifetime of the loop.
pub struct Shell {
    session: Session,
    chart_width: usize,
}

impl Shell {
    pub fn new(session: Session, chart_width: usize) -> Self {
        Self {
            session,
            chart_width,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands until `quit` or end of input. Command errors are printed
    /// and the session carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "Pocketbook session started. Type 'help' for commands, 'quit' to leave."
        )?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if !self.execute(&line?, out)? {
                break;
            }
        }
        Ok(())
    }

    /// Execute one line. Returns false when the session should end.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                return Ok(true);
            }
        };
        if words.is_empty() {
            return Ok(true);
        }

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Also covers `help`, which clap reports as an "error".
                write!(out, "{}", e)?;
                return Ok(true);
            }
        };

        let result = match parsed.command {
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Capture(cmd) => run_capture_command(&mut self.session, cmd, out),
            ShellCommand::Report(cmd) => {
                run_report_command(&self.session, cmd, self.chart_width, out)
            }
        };
        if let Err(e) = result {
            tracing::debug!("command failed: {e:#}");
            writeln!(out, "Error: {:#}", e)?;
        }
        Ok(true)
    }
}

/// Split a command line into words. Double quotes group words and may
/// contain `\"` escapes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err("dangling escape at end of line".to_string()),
            },
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
