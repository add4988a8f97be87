pub mod commands;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use katalog_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "katalog",
    about = "Product catalog search CLI",
    long_about = "Search a product catalog by keyword, by structured criteria, or with a free-text \
                  shopper question. Every command prints one JSON object on stdout; logs go to \
                  stderr.",
    after_help = "Examples:\n  katalog search samsung\n  katalog ask hp murah\n  \
                  katalog smart-search --category laptop --max-price 20000000"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file path (default: katalog.toml)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "JSON catalog file, overrides the configured catalog.path")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank products matching a keyword across every searchable field")]
    Search {
        keyword: String,
        #[arg(long, allow_negative_numbers = true, help = "Maximum results; 0 or less is empty")]
        limit: Option<i64>,
    },
    #[command(about = "Run the staged fallback search on explicit criteria")]
    SmartSearch {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, help = "Price ceiling in whole rupiah")]
        max_price: Option<u64>,
        #[arg(long, allow_negative_numbers = true, help = "Maximum results; 0 or less is empty")]
        limit: Option<i64>,
    },
    #[command(about = "Answer a free-text shopper question")]
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        #[arg(long, allow_negative_numbers = true, help = "Maximum results; 0 or less is empty")]
        limit: Option<i64>,
    },
    #[command(about = "List distinct catalog categories")]
    Categories,
    #[command(about = "List distinct catalog brands")]
    Brands,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_path: self.catalog.clone(),
                log_level: self.log_level.clone(),
                log_format: None,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    init_logging(&options);

    let result = match cli.command {
        Command::Search { keyword, limit } => commands::search::run(&options, &keyword, limit),
        Command::SmartSearch { keyword, category, max_price, limit } => {
            commands::search::run_smart(
                &options,
                commands::search::SmartSearchArgs { keyword, category, max_price, limit },
            )
        }
        Command::Ask { question, limit } => {
            commands::ask::run(&options, &question.join(" "), limit)
        }
        Command::Categories => commands::catalog::categories(&options),
        Command::Brands => commands::catalog::brands(&options),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the stderr subscriber. A broken config still gets default logging;
/// the command itself reports the config error.
fn init_logging(options: &LoadOptions) {
    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    let filter = log_filter(&logging.level, env::var("RUST_LOG").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        eprintln!("katalog: a tracing subscriber was already installed");
    }
}

/// Non-blank, parseable `RUST_LOG` directives win over the configured level.
fn log_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}
