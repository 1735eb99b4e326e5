use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

use medscope::gateway::ModelId;
use medscope::paths::exports;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Diagnostic chat, report analysis and model evaluation logging", long_about = None)]
struct Cli {
    /// Config file (default: .medscope/config.toml, then ~/.medscope/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record store path, overrides [storage].database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Model to call (gemini-1.5-flash, gemini-1.5-pro)
    #[arg(long, global = true, value_parser = parse_model)]
    model: Option<ModelId>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Output-token budget (100-1000, step 50)
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the model (one message, or a REPL on stdin)
    Chat {
        /// Message to send; omit to read messages line by line
        message: Option<String>,
    },

    /// Extract a medical report (.pdf or .txt) and analyze it
    Analyze {
        /// Report file
        file: PathBuf,

        /// Only print the extracted text
        #[arg(long)]
        extract_only: bool,
    },

    /// Run the benchmark prompt set and log every result
    Eval {
        /// Write the run results as CSV (bare flag: evaluation_results.csv)
        #[arg(short, long, num_args = 0..=1, default_missing_value = exports::EVALUATION_RESULTS)]
        output: Option<PathBuf>,
    },

    /// Show logged records, newest first
    Db {
        /// Which log to show
        #[arg(value_enum)]
        view: DbView,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Usage and latency analytics over the logs
    Analytics {
        /// Number of top user queries (default from config)
        #[arg(long)]
        top: Option<usize>,

        /// Latency histogram buckets (default from config)
        #[arg(long)]
        bins: Option<usize>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Summarize the evaluation log
    Report {
        /// Write the full evaluation log as CSV (bare flag: test_report.csv)
        #[arg(short, long, num_args = 0..=1, default_missing_value = exports::TEST_REPORT)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DbView {
    Interactions,
    Evaluations,
}

fn parse_model(value: &str) -> Result<ModelId, String> {
    value.parse()
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .try_init();

    let cli = Cli::parse();
    debug!(
        "starting (config_set={}, db_set={}, model_set={})",
        cli.config.is_some(),
        cli.db.is_some(),
        cli.model.is_some()
    );

    let options = commands::GlobalOptions {
        config: cli.config,
        db: cli.db,
        model: cli.model,
        temperature: cli.temperature,
        max_tokens: cli.max_tokens,
    };

    match cli.command {
        Commands::Chat { message } => {
            commands::chat::execute(&options, message)?;
        }
        Commands::Analyze { file, extract_only } => {
            commands::analyze::execute(&options, &file, extract_only)?;
        }
        Commands::Eval { output } => {
            commands::eval::execute(&options, output.as_deref())?;
        }
        Commands::Db { view, json } => {
            let view = match view {
                DbView::Interactions => commands::db::View::Interactions,
                DbView::Evaluations => commands::db::View::Evaluations,
            };
            commands::db::execute(&options, view, json)?;
        }
        Commands::Analytics { top, bins, json } => {
            commands::analytics::execute(&options, top, bins, json)?;
        }
        Commands::Report { output } => {
            commands::report::execute(&options, output.as_deref())?;
        }
    }

    Ok(())
}
