//! Frequency tables and the `"<count> <word>"` file format shared by the
//! aggregator and the estimator.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Word counts accumulated by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, word: &str) {
        *self.counts.entry(word.to_owned()).or_insert(0) += 1;
    }

    /// Count for `word`, 0 when it never occurred.
    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    ///Words sorted by count (descending), ties broken alphabetically.
    /// # Example
    /// ```
    /// use fightin_words::FrequencyTable;
    /// let mut table = FrequencyTable::new();
    /// for w in ["two", "one", "two", "three", "three", "three"] {
    ///     table.increment(w);
    /// }
    /// let expected = vec![("three", 3), ("two", 2), ("one", 1)];
    /// assert_eq!(table.sorted(), expected);
    /// ```
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut vec_sorted: Vec<(&str, u64)> =
            self.counts.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        vec_sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        vec_sorted
    }
}

/// Writes `"<count> <word>"` lines for each word of `vocabulary`, in order,
/// looking counts up in `table` (absent words are written as 0).
pub fn write_counts(path: &Path, vocabulary: &[&str], table: &FrequencyTable) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    for word in vocabulary {
        writeln!(out, "{} {}", table.get(word), word).map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))
}

/// Real-valued counts as read from disk, before the estimator's rounding.
pub type RawCounts = BTreeMap<String, f64>;

/// Loads a `"<count> <word>"` file.
///
/// Only the first space separates count from word. Blank lines are
/// ignored and a repeated word keeps its last count.
pub fn read_counts(path: &Path) -> Result<RawCounts> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut counts = RawCounts::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (count, word) = parse_count_line(line).ok_or_else(|| Error::MalformedCountLine {
            path: path.to_path_buf(),
            line: index + 1,
            content: line.to_string(),
        })?;
        counts.insert(word.to_string(), count);
    }
    Ok(counts)
}

fn parse_count_line(line: &str) -> Option<(f64, &str)> {
    let (count, word) = line.split_once(' ')?;
    if word.is_empty() {
        return None;
    }
    let count: f64 = count.parse().ok()?;
    if !count.is_finite() || count < 0.0 {
        return None;
    }
    Some((count, word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_first_space() {
        assert_eq!(parse_count_line("3 new york"), Some((3.0, "new york")));
        assert_eq!(parse_count_line("2.5 word"), Some((2.5, "word")));
        assert_eq!(parse_count_line("word"), None);
        assert_eq!(parse_count_line("x word"), None);
        assert_eq!(parse_count_line("-1 word"), None);
        assert_eq!(parse_count_line("NaN word"), None);
        assert_eq!(parse_count_line("4 "), None);
    }

    #[test]
    fn read_and_write_round_trip_through_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.txt");
        let mut table = FrequencyTable::new();
        table.increment("b");
        table.increment("b");
        table.increment("a");
        write_counts(&path, &["b", "a", "zero"], &table).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2 b\n1 a\n0 zero\n");

        let raw = read_counts(&path).unwrap();
        assert_eq!(raw.get("zero"), Some(&0.0));
        assert_eq!(raw.get("b"), Some(&2.0));
    }

    #[test]
    fn malformed_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "1 ok\n\nbroken\n").unwrap();
        match read_counts(&path).unwrap_err() {
            Error::MalformedCountLine { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
