//! objsplit command line
//!
//! Run with no arguments to split `assets/chess_pieces.obj` into
//! `assets/chess/<piece>.obj`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use objsplit::{ChessSplitter, MarkerPolicy, SplitConfig, SplitReport, TrailingPolicy};
use objsplit::structs_and_impls::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_DIR};

/// Split a composite chess-piece OBJ file into one OBJ file per piece.
#[derive(Parser, Debug)]
#[command(name = "objsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Composite OBJ document to split
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Directory receiving `<name>.obj` files (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Keep the `object` marker line as the first line of its piece
    #[arg(long)]
    include_marker: bool,

    /// Drop the last piece when the input ends without an END line
    #[arg(long)]
    discard_trailing: bool,

    /// Run the pass and print the report without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn split_config(&self) -> SplitConfig {
        let marker_policy = if self.include_marker {
            MarkerPolicy::Include
        } else {
            MarkerPolicy::Exclude
        };
        let trailing_policy = if self.discard_trailing {
            TrailingPolicy::Discard
        } else {
            TrailingPolicy::Flush
        };

        SplitConfig::new(&self.input, &self.output_dir)
            .with_marker_policy(marker_policy)
            .with_trailing_policy(trailing_policy)
            .with_dry_run(self.dry_run)
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let report = match ChessSplitter::new(cli.split_config()).run() {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "split failed");
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = print_report(&report, cli.format) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn print_report(report: &SplitReport, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            if report.dry_run {
                println!("(dry run - no files were written)");
            }
            println!("Split {}:", report.input_path.display());
            for segment in &report.segments {
                println!(
                    "  {:<20} {:>6} lines {:>9} bytes  -> {}",
                    segment.name,
                    segment.line_count,
                    segment.bytes,
                    segment.path.display()
                );
            }
            println!();
            println!("  Pieces:            {}", report.segments.len());
            println!("  Lines read:        {}", report.stats.lines_read);
            println!("  Comments dropped:  {}", report.stats.comments_dropped);
            if report.stats.orphan_lines > 0 {
                println!("  Orphan lines:      {}", report.stats.orphan_lines);
            }
            if report.stats.discarded_trailing > 0 {
                println!("  Trailing dropped:  {} lines", report.stats.discarded_trailing);
            }
            println!(
                "  Terminated by:     {}",
                if report.stats.ended_by_marker { "END marker" } else { "end of input" }
            );
        }
    }
    Ok(())
}
