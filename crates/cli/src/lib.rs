pub mod commands;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::process::ExitCode;

use crate::commands::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(
    name = "shopwise",
    about = "Shopwise operator CLI",
    long_about = "Operate the Shopwise catalog database, inspect configuration, and check readiness.",
    after_help = "Examples:\n  shopwise migrate\n  shopwise seed\n  shopwise doctor --json\n  shopwise search headphones --limit 5"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the sample product catalog when the product table is empty")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, provider credentials, DB connectivity and catalog data")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Search the product catalog and print matches as JSON")]
    Search {
        #[arg(default_value = "", help = "Text matched against name, description and brand")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
        #[arg(long, default_value_t = shopwise_core::DEFAULT_SEARCH_LIMIT)]
        limit: i64,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Search { query, category, min_price, max_price, limit } => {
            commands::search::run(SearchArgs { query, category, min_price, max_price, limit })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
