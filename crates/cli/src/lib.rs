pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "petworld",
    about = "PetWorld operator CLI",
    long_about = "Prepare the PetWorld database, ask the catalog assistant from the terminal, and inspect configuration.",
    after_help = "Examples:\n  petworld migrate\n  petworld ask \"Co polecasz dla kota?\"\n  petworld doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the starter product catalog (no-op when products already exist)")]
    Seed,
    #[command(about = "Answer a customer question through the writer/critic loop and record it")]
    Ask {
        #[arg(help = "Question to answer, in any language the model understands")]
        question: String,
    },
    #[command(about = "List recorded conversations, newest first")]
    History,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, LLM settings, DB connectivity and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Ask { question } => commands::ask::run(&question),
        Command::History => commands::history::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
