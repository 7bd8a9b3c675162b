//! Word normalization for descriptor tokens.

use std::collections::BTreeSet;

/// ASCII punctuation removed from every counted word by default.
pub const ASCII_PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Immutable set of characters stripped from words before counting.
///
/// Case and inner whitespace are left untouched, words are counted exactly
/// as the upstream extraction pass produced them minus these characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunctuationTable {
    chars: BTreeSet<char>,
}

impl Default for PunctuationTable {
    fn default() -> Self {
        Self {
            chars: ASCII_PUNCTUATION.chars().collect(),
        }
    }
}

impl PunctuationTable {
    /// Table that strips nothing.
    pub fn empty() -> Self {
        Self {
            chars: BTreeSet::new(),
        }
    }

    /// Default ASCII table extended with `extra` (e.g. typographic quotes).
    pub fn with_extra(extra: &str) -> Self {
        let mut table = Self::default();
        table.chars.extend(extra.chars());
        table
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    ///Removes every punctuation character from `word`.
    /// # Example
    /// ```
    /// use fightin_words::PunctuationTable;
    /// let table = PunctuationTable::default();
    /// assert_eq!(table.strip("(don't!)"), "dont");
    /// assert_eq!(table.strip("..."), "");
    /// ```
    pub fn strip(&self, word: &str) -> String {
        word.chars().filter(|c| !self.contains(*c)).collect()
    }
}
