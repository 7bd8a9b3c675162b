//! Descriptor tables written by the dependency-parse extraction pass.
//!
//! Each row is `position_id,document_id,word,category,head_word,head_pos,relation`.
//! The table has no header line and fields are never quoted, so a `"` token
//! is an ordinary character.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use clap::ValueEnum;
use log::debug;

use crate::error::{Error, Result};

/// Minimum number of fields a row needs to be usable (up to `category`).
pub const MIN_FIELDS: usize = 4;

/// One token occurrence tagged with a demographic category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRecord {
    pub position_id: String,
    pub document_id: String,
    pub word: String,
    pub category: String,
    pub head_word: String,
    pub head_pos: String,
    pub relation: String,
}

/// Which column of a descriptor row is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CountColumn {
    /// The tagged person/group token
    #[default]
    Word,
    /// The governing descriptor (verb or adjective)
    HeadWord,
}

impl DescriptorRecord {
    /// Builds a record from raw fields, `None` when too few are present.
    pub fn from_fields<'a, I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() < MIN_FIELDS {
            return None;
        }
        let get = |i: usize| fields.get(i).map(|s| s.to_string()).unwrap_or_default();
        Some(Self {
            position_id: get(0),
            document_id: get(1),
            word: get(2),
            category: get(3),
            head_word: get(4),
            head_pos: get(5),
            relation: get(6),
        })
    }

    /// `(document_id, position_id)` identifying this token occurrence.
    pub fn occurrence_key(&self) -> (&str, &str) {
        (&self.document_id, &self.position_id)
    }

    pub fn counted(&self, column: CountColumn) -> &str {
        match column {
            CountColumn::Word => &self.word,
            CountColumn::HeadWord => &self.head_word,
        }
    }
}

/// Records in file order plus the number of rows that had to be skipped.
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub records: Vec<DescriptorRecord>,
    pub skipped: usize,
}

/// Reads a whole descriptor table into memory.
///
/// Rows with fewer than [`MIN_FIELDS`] fields are skipped.
pub fn load_records(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_records(file).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses descriptor rows from any reader.
pub fn read_records<R: Read>(reader: R) -> std::result::Result<RecordBatch, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut batch = RecordBatch::default();
    for (index, row) in rdr.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            // invalid UTF-8 only affects this row
            Err(e) if !e.is_io_error() => {
                debug!("skipping unreadable row {}: {}", index + 1, e);
                batch.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        match DescriptorRecord::from_fields(row.iter()) {
            Some(record) => batch.records.push(record),
            None => {
                debug!(
                    "skipping row {}: {} field(s), need at least {}",
                    index + 1,
                    row.len(),
                    MIN_FIELDS
                );
                batch.skipped += 1;
            }
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_and_short_rows() {
        let data = "p1,d1,black,marked,woman,NOUN,amod\n\
                    p2,d1,woman,unmarked\n\
                    p3,d2\n\
                    \n\
                    p4,d2,man,unmarked,said,VERB,nsubj\n";
        let batch = read_records(data.as_bytes()).unwrap();
        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.records[0].head_word, "woman");
        assert_eq!(batch.records[1].head_word, "");
        assert_eq!(batch.records[2].occurrence_key(), ("d2", "p4"));
    }

    #[test]
    fn bare_quote_tokens_do_not_swallow_rows() {
        let data = "p1,d1,woman,unmarked,\",PUNCT,amod\n\
                    p2,d1,man,unmarked,tall,ADJ,amod\n\
                    p3,d2,\"girl,unmarked,smart,ADJ,amod\n";
        let batch = read_records(data.as_bytes()).unwrap();
        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.records[0].head_word, "\"");
        assert_eq!(batch.records[0].head_pos, "PUNCT");
        assert_eq!(batch.records[1].word, "man");
        assert_eq!(batch.records[2].word, "\"girl");
        assert_eq!(batch.records[2].category, "unmarked");
    }

    #[test]
    fn fields_keep_surrounding_spaces() {
        let batch = read_records("p1,d1, she ,female\n".as_bytes()).unwrap();
        assert_eq!(batch.records[0].word, " she ");
    }

    #[test]
    fn counted_column_selection() {
        let rec = DescriptorRecord::from_fields("p1,d1,she,female,ran,VERB,nsubj".split(','))
            .unwrap();
        assert_eq!(rec.counted(CountColumn::Word), "she");
        assert_eq!(rec.counted(CountColumn::HeadWord), "ran");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_records(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
