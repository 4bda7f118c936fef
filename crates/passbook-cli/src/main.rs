mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "passbook",
    version,
    about = "Extract transactions from bank statement PDFs and text"
)]
struct Cli {
    /// Log classification decisions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Backend tried when the text layer yields no transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Fallback {
    /// Render pages and run tesseract OCR
    Ocr,
    /// Cluster the PDF's embedded word boxes (pdftotext -bbox)
    Words,
    /// Stop after the text layer
    #[value(name = "none")]
    Disabled,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract transactions from a statement (PDF, or .txt with one line per row)
    Parse {
        /// Path to a PDF or plain-text statement
        input_file: PathBuf,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a file (CSV for a .csv extension, JSON otherwise)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Predefined parser configuration
        #[arg(short, long, default_value = "default", value_name = "NAME")]
        preset: String,

        /// Custom JSON parser configuration (overrides --preset)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Second tier used when the text layer yields nothing
        #[arg(long, value_enum, default_value = "ocr")]
        fallback: Fallback,

        /// Rendering resolution for OCR
        #[arg(long, default_value_t = passbook_core::extraction::tesseract::DEFAULT_DPI)]
        dpi: u32,

        /// Tesseract language(s), e.g. "eng" or "eng+hin"
        #[arg(long, default_value = passbook_core::extraction::tesseract::DEFAULT_LANG)]
        lang: String,

        /// Directory for diagnostic dumps (text and OCR lines, parsed preview)
        #[arg(long, value_name = "DIR")]
        debug_dir: Option<PathBuf>,
    },
    /// Manage and inspect parser configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List predefined configurations
    List,
    /// Print a predefined configuration as JSON
    Show {
        /// Preset name (e.g., "default")
        preset: String,
    },
    /// Print the configuration schema with field descriptions
    Schema,
    /// Validate a custom configuration file
    Validate {
        /// Path to JSON configuration file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
            preset,
            config,
            fallback,
            dpi,
            lang,
            debug_dir,
        } => commands::parse::run(commands::parse::ParseArgs {
            input_file,
            output_format: output,
            output_file: out,
            preset,
            config,
            fallback,
            dpi,
            lang,
            debug_dir,
        }),
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(),
            ConfigAction::Show { preset } => commands::config::show(&preset),
            ConfigAction::Schema => commands::config::schema(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
