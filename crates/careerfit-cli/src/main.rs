//! careerfit CLI: take, score, and compare career-fit assessments.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "careerfit", version, about = "Career-fit questionnaire and scorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the assessment interactively
    Take {
        /// Catalog TOML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the report is saved to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,
    },

    /// Score a file of prepared answers
    Score {
        /// Answers TOML file
        #[arg(long)]
        answers: PathBuf,

        /// Catalog TOML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Also save the report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List catalog questions
    Questions {
        /// Catalog TOML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only show one category: psychometric, technical, wiscar
        #[arg(long)]
        category: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a catalog file
    Validate {
        /// Catalog TOML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Compare two saved reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Minimum change in points to report
        #[arg(long, default_value = "1.0")]
        threshold: f64,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example answers file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "careerfit=info,careerfit_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            catalog,
            config,
            output,
            format,
        } => commands::take::execute(catalog, format, output, config),
        Commands::Score {
            answers,
            catalog,
            format,
            output,
            config,
        } => commands::score::execute(answers, catalog, format, output, config),
        Commands::Questions {
            catalog,
            category,
            config,
        } => commands::questions::execute(catalog, category, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Compare {
            baseline,
            current,
            threshold,
            format,
        } => commands::compare::execute(baseline, current, threshold, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
