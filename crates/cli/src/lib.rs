pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "restock",
    about = "Restock operator CLI",
    long_about = "Validate catalog files, preview substitute predictions, and inspect configuration offline.",
    after_help = "Examples:\n  restock check --catalog catalog.json\n  restock predict --catalog catalog.json 101\n  restock search --catalog catalog.json lapte\n  restock config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Assemble and validate a catalog file without starting the server")]
    Check {
        #[arg(long, help = "JSON file holding `nomenclature` and `sales` rows")]
        catalog: PathBuf,
    },
    #[command(about = "Rank substitutes for one product from a catalog file")]
    Predict {
        #[arg(long, help = "JSON file holding `nomenclature` and `sales` rows")]
        catalog: PathBuf,
        #[arg(help = "Identifier of the out-of-stock product")]
        product_id: u64,
        #[arg(long, help = "JSON array of training batches applied before predicting")]
        train_file: Option<PathBuf>,
    },
    #[command(about = "Search product names in a catalog file")]
    Search {
        #[arg(long, help = "JSON file holding `nomenclature` and `sales` rows")]
        catalog: PathBuf,
        query: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check { catalog } => commands::check::run(&catalog),
        Command::Predict { catalog, product_id, train_file } => {
            commands::predict::run(&catalog, product_id, train_file.as_deref())
        }
        Command::Search { catalog, query } => commands::search::run(&catalog, &query),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
