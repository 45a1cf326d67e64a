pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cruisemate_core::config::{AppConfig, LoadOptions, LogFormat};
use tracing::Level;

use crate::commands::resolve::ResolveArgs;

#[derive(Debug, Parser)]
#[command(
    name = "cruisemate",
    about = "Cruisemate planning tools CLI",
    long_about = "Turn free-text cruise requests into structured preferences and date ranges.",
    after_help = "Examples:\n  cruisemate extract \"balcony cabin under \\$1500 for 4 people\"\n  cruisemate resolve \"next summer\" --reference-date 2024-07-01\n  cruisemate call date_resolver_tool '{\"time_expression\":\"in 3 months\"}'"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a cruisemate.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Extract structured travel preferences from free text")]
    Extract {
        #[arg(required = true, num_args = 1.., help = "Traveller message")]
        text: Vec<String>,
    },
    #[command(about = "Resolve a vague time expression into a date range")]
    Resolve {
        #[arg(required = true, num_args = 1.., help = "Time expression, e.g. \"next summer\"")]
        expression: Vec<String>,
        #[arg(long, help = "Reference date in YYYY-MM-DD format (defaults to today)")]
        reference_date: Option<String>,
        #[arg(long, help = "Fail when the resolved confidence is below this value")]
        min_confidence: Option<f64>,
    },
    #[command(about = "List the tools exposed to the conversational agent")]
    Tools,
    #[command(about = "Invoke a tool with a JSON arguments object")]
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        arguments: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Extract { text } => commands::extract::run(&text.join(" ")),
        Command::Resolve { expression, reference_date, min_confidence } => {
            let args =
                ResolveArgs { expression: expression.join(" "), reference_date, min_confidence };
            commands::resolve::run(options, &args)
        }
        Command::Tools => commands::tools::run(options),
        Command::Call { tool, arguments } => commands::call::run(options, &tool, &arguments),
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(config: &AppConfig) {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
