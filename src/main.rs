#![forbid(unsafe_code)]
//! # Fightin' Words CLI
//!
//! Command-line interface for the `fightin_words` crate.
//!
//! ## Commands
//! - `count`: turn a descriptor table into `group1_counts.txt`,
//!   `group2_counts.txt` and `all_counts.txt`.
//! - `score`: rank words by weighted log-odds from three count files.
//! - `run`: both of the above, writing `log_odds.txt` next to the counts.
//!
//! ## Example
//! ```bash
//! cargo run --release -- run --input-file people_descriptors.csv \
//!     --output-dir out --group1 black,asian --group2 white
//! ```
//!
//! Set `RUST_LOG=info` for progress messages.

use clap::{Args, Parser, Subcommand};
use fightin_words::{
    AggregateOptions, CategorySet, CountColumn, DegeneratePolicy, EstimatorOptions, ExportFormat,
    PunctuationTable, aggregate_file, estimate_files, render_scores, run_pipeline, write_scores,
};
use log::error;
use std::io::Write;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a descriptor table into group and background count files
    Count(CountArgs),
    /// Compute weighted log-odds scores from three count files
    Score(ScoreArgs),
    /// Aggregate, then score group 1 against group 2
    Run {
        #[command(flatten)]
        count: CountArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct CountArgs {
    /// Descriptor table (position_id,document_id,word,category,head_word,head_pos,relation)
    #[arg(long)]
    input_file: PathBuf,

    /// Directory for the count files (created if missing)
    #[arg(long)]
    output_dir: PathBuf,

    /// Comma-separated categories of the first group
    #[arg(long)]
    group1: String,

    /// Comma-separated categories of the second group
    #[arg(long)]
    group2: String,

    /// Column to count
    #[arg(long, value_enum, default_value_t = CountColumn::Word)]
    count_column: CountColumn,

    /// Characters stripped in addition to ASCII punctuation (e.g. "“”’")
    #[arg(long, default_value = "")]
    extra_punctuation: String,
}

#[derive(Args)]
struct ScoreArgs {
    /// Counts of the first comparison corpus
    #[arg(short, long, default_value = "greatreviews.out")]
    first: PathBuf,

    /// Counts of the second comparison corpus
    #[arg(short, long, default_value = "badreviews.out")]
    second: PathBuf,

    /// Background counts used as prior
    #[arg(short, long, default_value = "allreviewwords.out")]
    prior: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    export: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (txt, csv, json)
    #[arg(long, value_enum, default_value_t = ExportFormat::Txt)]
    format: ExportFormat,

    /// Skip words whose score cannot be computed instead of failing
    #[arg(long, default_value_t = false)]
    skip_degenerate: bool,
}

impl CountArgs {
    fn options(&self) -> AggregateOptions {
        AggregateOptions {
            count_column: self.count_column,
            punctuation: PunctuationTable::with_extra(&self.extra_punctuation),
        }
    }
}

impl OutputArgs {
    fn estimator(&self) -> EstimatorOptions {
        EstimatorOptions {
            degenerate: if self.skip_degenerate {
                DegeneratePolicy::Skip
            } else {
                DegeneratePolicy::Abort
            },
        }
    }
}

fn run(cli: Cli) -> fightin_words::Result<()> {
    match cli.command {
        Command::Count(args) => {
            let categories = CategorySet::parse(&args.group1, &args.group2)?;
            let summary =
                aggregate_file(&args.input_file, &args.output_dir, &categories, &args.options())?;
            println!(
                "{} word(s) from {} record(s) written to {}",
                summary.vocabulary,
                summary.records,
                args.output_dir.display()
            );
        }
        Command::Score(args) => {
            let scores = estimate_files(
                &args.first,
                &args.second,
                &args.prior,
                &args.export.estimator(),
            )?;
            match &args.output {
                Some(path) => write_scores(path, &scores, args.export.format)?,
                None => {
                    let rendered = render_scores(&scores, args.export.format)?;
                    let mut stdout = std::io::stdout().lock();
                    stdout
                        .write_all(rendered.as_bytes())
                        .map_err(|e| fightin_words::Error::Io {
                            path: "<stdout>".into(),
                            source: e,
                        })?;
                }
            }
        }
        Command::Run { count, output } => {
            let categories = CategorySet::parse(&count.group1, &count.group2)?;
            let report = run_pipeline(
                &count.input_file,
                &count.output_dir,
                &categories,
                &count.options(),
                &output.estimator(),
                output.format,
            )?;
            println!(
                "{} word(s) scored, results in {}",
                report.scores.len(),
                report.output.display()
            );
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}
