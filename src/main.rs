use anyhow::Result;
use clap::Parser;
use pocketbook::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
