//! Count aggregation: descriptor records to two comparison-group tables and
//! one background table.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::counts::{FrequencyTable, write_counts};
use crate::error::{Error, Result};
use crate::records::{CountColumn, DescriptorRecord, load_records};
use crate::text::PunctuationTable;

pub const GROUP1_FILE: &str = "group1_counts.txt";
pub const GROUP2_FILE: &str = "group2_counts.txt";
pub const ALL_FILE: &str = "all_counts.txt";

/// Two disjoint sets of category names selecting the comparison groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    group1: BTreeSet<String>,
    group2: BTreeSet<String>,
}

impl CategorySet {
    pub fn new<I, J, S, T>(group1: I, group2: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let group1: BTreeSet<String> = group1.into_iter().map(Into::into).collect();
        let group2: BTreeSet<String> = group2.into_iter().map(Into::into).collect();
        if group1.is_empty() || group2.is_empty() {
            return Err(Error::InvalidCategories(
                "both groups need at least one category".to_string(),
            ));
        }
        let shared: Vec<&str> = group1.intersection(&group2).map(String::as_str).collect();
        if !shared.is_empty() {
            return Err(Error::InvalidCategories(format!(
                "categories in both groups: {}",
                shared.join(", ")
            )));
        }
        Ok(Self { group1, group2 })
    }

    /// Parses comma-separated category lists such as `"black,asian"`.
    ///
    /// Names are trimmed and empty entries ignored.
    pub fn parse(group1: &str, group2: &str) -> Result<Self> {
        Self::new(split_names(group1), split_names(group2))
    }

    pub fn in_group1(&self, category: &str) -> bool {
        self.group1.contains(category)
    }

    pub fn in_group2(&self, category: &str) -> bool {
        self.group2.contains(category)
    }
}

fn split_names(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Settings for an aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    pub count_column: CountColumn,
    pub punctuation: PunctuationTable,
}

/// The three tables produced by one aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCounts {
    pub group_a: FrequencyTable,
    pub group_b: FrequencyTable,
    pub background: FrequencyTable,
    /// Occurrences claimed by group 1.
    pub claimed: usize,
    /// Records whose counted word was empty after punctuation stripping.
    pub empty_words: usize,
}

impl GroupCounts {
    /// Background vocabulary ordered by background count, then word.
    pub fn vocabulary(&self) -> Vec<&str> {
        self.background.sorted().into_iter().map(|(w, _)| w).collect()
    }
}

///Partitions descriptor counts into group 1, group 2 and background tables.
///
///The first pass counts group-1 rows and claims their occurrence keys. The
///second pass counts every row into the background table and group-2 rows
///into `group_b` unless their occurrence was already claimed. Rows whose
///counted word is empty after punctuation stripping are not counted anywhere
///and are tallied in [`GroupCounts::empty_words`].
pub fn aggregate(
    records: &[DescriptorRecord],
    categories: &CategorySet,
    options: &AggregateOptions,
) -> GroupCounts {
    let mut counts = GroupCounts::default();
    let mut claimed: HashSet<(&str, &str)> = HashSet::new();

    for record in records {
        if !categories.in_group1(&record.category) {
            continue;
        }
        let word = options.punctuation.strip(record.counted(options.count_column));
        if word.is_empty() {
            continue;
        }
        counts.group_a.increment(&word);
        claimed.insert(record.occurrence_key());
    }

    for record in records {
        let word = options.punctuation.strip(record.counted(options.count_column));
        if word.is_empty() {
            counts.empty_words += 1;
            continue;
        }
        counts.background.increment(&word);
        if categories.in_group2(&record.category) {
            if claimed.contains(&record.occurrence_key()) {
                debug!(
                    "{:?} at {:?} already claimed by group 1",
                    word,
                    record.occurrence_key()
                );
            } else {
                counts.group_b.increment(&word);
            }
        }
    }

    counts.claimed = claimed.len();
    counts
}

/// What one aggregation run read and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    pub records: usize,
    pub skipped: usize,
    pub empty_words: usize,
    pub vocabulary: usize,
    pub group_a_total: u64,
    pub group_b_total: u64,
    pub background_total: u64,
    pub claimed: usize,
    pub group1_path: PathBuf,
    pub group2_path: PathBuf,
    pub all_path: PathBuf,
}

/// Writes the three count files into `output_dir` (created if missing).
///
/// All three files list the same background vocabulary in the same order.
pub fn write_group_counts(output_dir: &Path, counts: &GroupCounts) -> Result<[PathBuf; 3]> {
    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    let vocabulary = counts.vocabulary();

    let group1_path = output_dir.join(GROUP1_FILE);
    let group2_path = output_dir.join(GROUP2_FILE);
    let all_path = output_dir.join(ALL_FILE);
    write_counts(&group1_path, &vocabulary, &counts.group_a)?;
    write_counts(&group2_path, &vocabulary, &counts.group_b)?;
    write_counts(&all_path, &vocabulary, &counts.background)?;
    Ok([group1_path, group2_path, all_path])
}

/// Loads a descriptor table, aggregates it and writes the count files.
pub fn aggregate_file(
    input_file: &Path,
    output_dir: &Path,
    categories: &CategorySet,
    options: &AggregateOptions,
) -> Result<AggregateSummary> {
    let batch = load_records(input_file)?;
    info!(
        "read {} descriptor record(s) from {} ({} skipped)",
        batch.records.len(),
        input_file.display(),
        batch.skipped
    );

    let counts = aggregate(&batch.records, categories, options);
    let [group1_path, group2_path, all_path] = write_group_counts(output_dir, &counts)?;

    let summary = AggregateSummary {
        records: batch.records.len(),
        skipped: batch.skipped,
        empty_words: counts.empty_words,
        vocabulary: counts.background.len(),
        group_a_total: counts.group_a.total(),
        group_b_total: counts.group_b.total(),
        background_total: counts.background.total(),
        claimed: counts.claimed,
        group1_path,
        group2_path,
        all_path,
    };
    info!(
        "vocabulary {}: group 1 {}, group 2 {}, background {} ({} claimed occurrence(s), {} empty word(s))",
        summary.vocabulary,
        summary.group_a_total,
        summary.group_b_total,
        summary.background_total,
        summary.claimed,
        summary.empty_words
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pos: &str, doc: &str, word: &str, category: &str) -> DescriptorRecord {
        DescriptorRecord::from_fields([pos, doc, word, category, "said", "VERB", "nsubj"]).unwrap()
    }

    fn marked_unmarked() -> CategorySet {
        CategorySet::parse("marked", "unmarked").unwrap()
    }

    #[test]
    fn claimed_occurrence_is_not_counted_for_group2() {
        let records = vec![
            rec("p1", "d1", "black", "marked"),
            rec("p1", "d1", "woman", "unmarked"),
        ];
        let counts = aggregate(&records, &marked_unmarked(), &AggregateOptions::default());

        assert_eq!(counts.group_a.get("black"), 1);
        assert_eq!(counts.group_b.get("woman"), 0);
        assert!(!counts.group_b.contains("woman"));
        assert_eq!(counts.background.get("woman"), 1);
        assert_eq!(counts.background.get("black"), 1);
        assert_eq!(counts.claimed, 1);
    }

    #[test]
    fn unclaimed_occurrences_count_for_group2() {
        let records = vec![
            rec("p1", "d1", "black", "marked"),
            rec("p1", "d2", "woman", "unmarked"),
            rec("p2", "d1", "woman", "unmarked"),
        ];
        let counts = aggregate(&records, &marked_unmarked(), &AggregateOptions::default());
        assert_eq!(counts.group_b.get("woman"), 2);
        assert_eq!(counts.background.get("woman"), 2);
    }

    #[test]
    fn background_is_superset_of_both_groups() {
        let records = vec![
            rec("1", "a", "Asian", "marked"),
            rec("2", "a", "man", "unmarked"),
            rec("3", "a", "people", "other"),
            rec("4", "b", "man", "unmarked"),
            rec("4", "b", "Latina", "marked"),
        ];
        let counts = aggregate(&records, &marked_unmarked(), &AggregateOptions::default());
        for word in counts.group_a.words().chain(counts.group_b.words()) {
            assert!(counts.background.contains(word), "{word} missing");
        }
        assert_eq!(counts.background.get("people"), 1);
        // "man" at (b, 4) is claimed by "Latina"
        assert_eq!(counts.group_b.get("man"), 1);
    }

    #[test]
    fn punctuation_only_words_are_skipped() {
        let records = vec![
            rec("1", "a", "...", "marked"),
            rec("2", "a", "--", "unmarked"),
            rec("3", "a", "wo-man", "unmarked"),
        ];
        let counts = aggregate(&records, &marked_unmarked(), &AggregateOptions::default());
        assert!(counts.group_a.is_empty());
        assert_eq!(counts.claimed, 0);
        assert_eq!(counts.empty_words, 2);
        assert_eq!(counts.background.len(), 1);
        assert_eq!(counts.group_b.get("woman"), 1);
    }

    #[test]
    fn head_word_column_can_be_counted() {
        let records = vec![rec("1", "a", "she", "marked")];
        let options = AggregateOptions {
            count_column: CountColumn::HeadWord,
            ..AggregateOptions::default()
        };
        let counts = aggregate(&records, &marked_unmarked(), &options);
        assert_eq!(counts.group_a.get("said"), 1);
        assert!(!counts.background.contains("she"));
    }

    #[test]
    fn category_sets_must_be_disjoint_and_non_empty() {
        assert!(CategorySet::parse("a,b", "b,c").is_err());
        assert!(CategorySet::parse("", "c").is_err());
        assert!(CategorySet::parse(" , ", "c").is_err());
        let set = CategorySet::parse("a, b", "c").unwrap();
        assert!(set.in_group1("b"));
        assert!(set.in_group2("c"));
        assert!(!set.in_group2("a"));
    }

    #[test]
    fn written_files_share_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            rec("1", "a", "black", "marked"),
            rec("2", "a", "woman", "unmarked"),
            rec("3", "a", "woman", "unmarked"),
        ];
        let counts = aggregate(&records, &marked_unmarked(), &AggregateOptions::default());
        let [g1, g2, all] = write_group_counts(&dir.path().join("out"), &counts).unwrap();

        assert_eq!(fs::read_to_string(g1).unwrap(), "0 woman\n1 black\n");
        assert_eq!(fs::read_to_string(g2).unwrap(), "2 woman\n0 black\n");
        assert_eq!(fs::read_to_string(all).unwrap(), "2 woman\n1 black\n");
    }
}
