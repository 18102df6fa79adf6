//! credits-jsonl CLI - Convert a movie credits CSV to JSON Lines
//!
//! # Main Command
//!
//! ```bash
//! credits-jsonl                                  # data/credits.csv -> src/data/movies.raw.jsonl
//! credits-jsonl --input credits.csv --output out/movies.jsonl
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! credits-jsonl inspect-headers --input credits.csv   # Show resolved cast/crew/id columns
//! credits-jsonl parse-cell "[{'name': 'Tom'}]"       # Parse one cell to JSON
//! ```

use clap::{Args, Parser, Subcommand};
use credits_jsonl::logs::init_logging;
use credits_jsonl::transform::open_input;
use credits_jsonl::{convert_file, parse_cell, resolve_columns, ColumnRef, CreditsTable, RunConfig};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "credits-jsonl")]
#[command(about = "Convert a movie credits CSV to JSON Lines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Input CSV file
    #[arg(short, long, default_value = credits_jsonl::config::DEFAULT_INPUT)]
    input: PathBuf,

    /// Output JSONL file (parent directory is created if needed)
    #[arg(short, long, default_value = credits_jsonl::config::DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the CSV to JSONL (default)
    Convert(ConvertArgs),

    /// Show which columns would be used for cast, crew and id
    InspectHeaders {
        /// Input CSV file
        #[arg(short, long, default_value = credits_jsonl::config::DEFAULT_INPUT)]
        input: PathBuf,
    },

    /// Parse a single cell and print the recovered entries as JSON
    ParseCell {
        /// Raw cell text
        text: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let verbosity = if cli.quiet { -1 } else { cli.verbose.min(i8::MAX as u8) as i8 };
    init_logging(verbosity);

    let result = match cli.command {
        None => cmd_convert(cli.convert),
        Some(Commands::Convert(args)) => cmd_convert(args),
        Some(Commands::InspectHeaders { input }) => cmd_inspect_headers(&input),
        Some(Commands::ParseCell { text }) => cmd_parse_cell(&text),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        RunConfig::new(args.input, args.output).resolved_against(&std::env::current_dir()?);
    let summary = convert_file(&config)?;

    println!("Wrote {} lines → {}", summary.written, config.output.display());
    Ok(())
}

fn cmd_inspect_headers(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = open_input(input)?;
    let table = CreditsTable::from_reader(BufReader::new(file))?;
    let columns = resolve_columns(table.headers());

    println!("Columns: {}", table.headers().join(", "));
    println!("  cast: {}", format_column(&columns.cast));
    println!("  crew: {}", format_column(&columns.crew));
    println!("  id:   {}", format_column(&columns.id));
    Ok(())
}

fn cmd_parse_cell(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let entries = parse_cell(text);
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn format_column(column: &Option<ColumnRef>) -> String {
    match column {
        Some(c) => c.to_string(),
        None => "(unresolved, per-row fallback)".to_string(),
    }
}
