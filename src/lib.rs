#![forbid(unsafe_code)]
//! # fightin_words
//!
//! Compare how two groups are described across a corpus.
//!
//! The crate consumes descriptor tables (one row per tagged token, produced by
//! an upstream dependency-parse pass) and offers two batch steps:
//!
//! - [`aggregate_file`] partitions descriptor counts into a group-1 table, a
//!   group-2 table and a background table. A token occurrence claimed by
//!   group 1 is never counted for group 2.
//! - [`estimate_files`] computes the weighted log-odds-ratio with an
//!   informative Dirichlet prior ("Fightin' Words", Monroe et al. 2009) for
//!   every word of the background vocabulary and ranks words by score.
//!
//! [`run_pipeline`] chains both steps and writes `log_odds.txt`.

use std::path::{Path, PathBuf};

use log::info;

mod aggregate;
mod counts;
mod error;
mod export;
mod log_odds;
mod records;
mod text;

pub use aggregate::{
    ALL_FILE, AggregateOptions, AggregateSummary, CategorySet, GROUP1_FILE, GROUP2_FILE,
    GroupCounts, aggregate, aggregate_file, write_group_counts,
};
pub use counts::{FrequencyTable, RawCounts, read_counts, write_counts};
pub use error::{Error, Result};
pub use export::{ExportFormat, csv_safe_cell, render_scores, write_scores};
pub use log_odds::{
    DegeneratePolicy, EstimatorOptions, SmoothedCounts, WordScore, estimate, estimate_files,
    sort_scores,
};
pub use records::{CountColumn, DescriptorRecord, RecordBatch, load_records, read_records};
pub use text::{ASCII_PUNCTUATION, PunctuationTable};

/// Base name of the ranked output written by [`run_pipeline`].
pub const LOG_ODDS_STEM: &str = "log_odds";

/// Result of a full aggregate-then-score run.
#[derive(Debug)]
pub struct PipelineReport {
    pub summary: AggregateSummary,
    pub scores: Vec<WordScore>,
    pub output: PathBuf,
}

/// Aggregates `input_file` into `output_dir`, scores group 1 against group 2
/// with the background table as prior, and writes `log_odds.<ext>` there.
pub fn run_pipeline(
    input_file: &Path,
    output_dir: &Path,
    categories: &CategorySet,
    aggregate_options: &AggregateOptions,
    estimator_options: &EstimatorOptions,
    format: ExportFormat,
) -> Result<PipelineReport> {
    let summary = aggregate_file(input_file, output_dir, categories, aggregate_options)?;
    let scores = estimate_files(
        &summary.group1_path,
        &summary.group2_path,
        &summary.all_path,
        estimator_options,
    )?;
    let output = output_dir.join(format!("{LOG_ODDS_STEM}.{}", format.extension()));
    write_scores(&output, &scores, format)?;
    info!("wrote {} score(s) to {}", scores.len(), output.display());
    Ok(PipelineReport {
        summary,
        scores,
        output,
    })
}
