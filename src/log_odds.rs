//! Weighted log-odds-ratio with informative Dirichlet prior.
//!
//! Monroe, Colaresi and Quinn (2009), "Fightin' Words: Lexical Feature
//! Selection and Evaluation for Identifying the Content of Political
//! Conflict", p. 388. The background table acts both as the pseudo-count
//! prior and as the vocabulary.

use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::counts::{RawCounts, read_counts};
use crate::error::{Error, Result};

/// What to do with a word whose score cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Fail the whole run, naming the word.
    #[default]
    Abort,
    /// Drop the word and log a warning.
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatorOptions {
    pub degenerate: DegeneratePolicy,
}

/// Score of one word, together with the smoothed inputs it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordScore {
    pub word: String,
    pub score: f64,
    pub count_a: f64,
    pub count_b: f64,
    pub prior: f64,
    pub stddev: f64,
}

/// Counts after rounding and zero-prior forcing.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedCounts {
    pub counts_a: RawCounts,
    pub counts_b: RawCounts,
    pub prior: RawCounts,
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

impl SmoothedCounts {
    /// Rounds the prior, then cross-fills and rounds the two group tables.
    ///
    /// Words of `counts_b` are processed first, then words of `counts_a`
    /// (which by then include every word of `counts_b`). A word that was
    /// observed in either group but has no prior mass gets a prior of 1.
    pub fn prepare(mut counts_a: RawCounts, mut counts_b: RawCounts, mut prior: RawCounts) -> Self {
        for value in prior.values_mut() {
            *value = round_half_up(*value);
        }

        for word in counts_b.keys() {
            let a = counts_a.entry(word.clone()).or_insert(0.0);
            *a = round_half_up(*a);
            force_prior(&mut prior, word);
        }

        for word in counts_a.keys() {
            let b = counts_b.entry(word.clone()).or_insert(0.0);
            *b = round_half_up(*b);
            force_prior(&mut prior, word);
        }

        Self {
            counts_a,
            counts_b,
            prior,
        }
    }

    fn get(table: &RawCounts, word: &str) -> f64 {
        table.get(word).copied().unwrap_or(0.0)
    }
}

fn force_prior(prior: &mut RawCounts, word: &str) {
    let p = prior.entry(word.to_string()).or_insert(0.0);
    if *p == 0.0 {
        debug!("forcing prior of unseen word {word:?} to 1");
        *p = 1.0;
    }
}

/// Ratio `(c + p) / (total - (c + p))` of one group, checked for domain errors.
fn odds(word: &str, smoothed: f64, total: f64, group: &str) -> Result<f64> {
    let denominator = total - smoothed;
    if denominator <= 0.0 {
        return Err(Error::DegenerateWord {
            word: word.to_string(),
            reason: format!(
                "group {group} denominator is {denominator} (smoothed count {smoothed} of total {total})"
            ),
        });
    }
    let ratio = smoothed / denominator;
    if ratio <= 0.0 || !ratio.is_finite() {
        return Err(Error::DegenerateWord {
            word: word.to_string(),
            reason: format!("group {group} odds ratio is {ratio}"),
        });
    }
    Ok(ratio)
}

/// Score of a single word given the smoothed tables and their totals.
fn score_word(word: &str, counts: &SmoothedCounts, totals: (f64, f64, f64)) -> Result<WordScore> {
    let (n_a, n_b, n_prior) = totals;
    let a = SmoothedCounts::get(&counts.counts_a, word);
    let b = SmoothedCounts::get(&counts.counts_b, word);
    let p = SmoothedCounts::get(&counts.prior, word);

    let y_a = odds(word, a + p, n_a + n_prior, "a")?;
    let y_b = odds(word, b + p, n_b + n_prior, "b")?;
    let variance = 1.0 / (a + p) + 1.0 / (b + p);
    let stddev = variance.sqrt();
    let score = (y_a.ln() - y_b.ln()) / stddev;
    if !score.is_finite() {
        return Err(Error::DegenerateWord {
            word: word.to_string(),
            reason: format!("score is {score}"),
        });
    }
    Ok(WordScore {
        word: word.to_string(),
        score,
        count_a: a,
        count_b: b,
        prior: p,
        stddev,
    })
}

///Computes the log-odds score of every word with positive prior mass.
///
///Positive scores mark words distinctive of `counts_a`, negative scores
///words distinctive of `counts_b`. The result is sorted ascending by score,
///ties broken by word.
/// # Example
/// ```
/// use fightin_words::{EstimatorOptions, RawCounts, estimate};
/// let a: RawCounts = [("good".to_string(), 10.0)].into_iter().collect();
/// let b: RawCounts = [("bad".to_string(), 10.0)].into_iter().collect();
/// let prior: RawCounts = [("good".to_string(), 5.0), ("bad".to_string(), 5.0)]
///     .into_iter()
///     .collect();
/// let scores = estimate(a, b, prior, &EstimatorOptions::default()).unwrap();
/// assert_eq!(scores[0].word, "bad");
/// assert!(scores[0].score < 0.0);
/// assert_eq!(scores[1].word, "good");
/// assert!(scores[1].score > 0.0);
/// ```
pub fn estimate(
    counts_a: RawCounts,
    counts_b: RawCounts,
    prior: RawCounts,
    options: &EstimatorOptions,
) -> Result<Vec<WordScore>> {
    let smoothed = SmoothedCounts::prepare(counts_a, counts_b, prior);
    let n_a: f64 = smoothed.counts_a.values().sum();
    let n_b: f64 = smoothed.counts_b.values().sum();
    let n_prior: f64 = smoothed.prior.values().sum();
    debug!("totals: a {n_a}, b {n_b}, prior {n_prior}");

    let mut scores = Vec::with_capacity(smoothed.prior.len());
    for (word, p) in &smoothed.prior {
        if *p <= 0.0 {
            continue;
        }
        match score_word(word, &smoothed, (n_a, n_b, n_prior)) {
            Ok(score) => scores.push(score),
            Err(e) if options.degenerate == DegeneratePolicy::Skip => warn!("skipping: {e}"),
            Err(e) => return Err(e),
        }
    }

    sort_scores(&mut scores);
    Ok(scores)
}

/// Sorts ascending by score using a total order, then by word.
pub fn sort_scores(scores: &mut [WordScore]) {
    scores.sort_by(|x, y| x.score.total_cmp(&y.score).then_with(|| x.word.cmp(&y.word)));
}

/// Reads the three count files and scores them.
pub fn estimate_files(
    first: &Path,
    second: &Path,
    prior: &Path,
    options: &EstimatorOptions,
) -> Result<Vec<WordScore>> {
    let counts_a = read_counts(first)?;
    let counts_b = read_counts(second)?;
    let prior_counts = read_counts(prior)?;
    info!(
        "loaded {} / {} / {} word(s) from {}, {}, {}",
        counts_a.len(),
        counts_b.len(),
        prior_counts.len(),
        first.display(),
        second.display(),
        prior.display()
    );
    let scores = estimate(counts_a, counts_b, prior_counts, options)?;
    info!("scored {} word(s)", scores.len());
    Ok(scores)
}
