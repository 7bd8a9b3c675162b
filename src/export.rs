//! Rendering of ranked scores as text, CSV or JSON.

use std::fs;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::log_odds::WordScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// `<word> <score>` lines, three decimals
    #[default]
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

///Neutralizes cells a spreadsheet would evaluate as a formula.
/// # Example
/// ```
/// use fightin_words::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)"), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("nurse"), "nurse");
/// ```
pub fn csv_safe_cell(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

/// Renders scores in the requested format.
pub fn render_scores(scores: &[WordScore], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Txt => Ok(scores
            .iter()
            .map(|s| format!("{} {:.3}\n", s.word, s.score))
            .collect()),
        ExportFormat::Csv => render_csv(scores),
        ExportFormat::Json => {
            let mut out = serde_json::to_string_pretty(scores)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn render_csv(scores: &[WordScore]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let to_err = Error::Export;
    wtr.write_record(["word", "score", "count_a", "count_b", "prior"])
        .map_err(to_err)?;
    for s in scores {
        wtr.write_record([
            csv_safe_cell(&s.word),
            format!("{:.3}", s.score),
            s.count_a.to_string(),
            s.count_b.to_string(),
            s.prior.to_string(),
        ])
        .map_err(to_err)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| to_err(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes rendered scores to `path`.
pub fn write_scores(path: &Path, scores: &[WordScore], format: ExportFormat) -> Result<()> {
    let rendered = render_scores(scores, format)?;
    fs::write(path, rendered).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<WordScore> {
        vec![
            WordScore {
                word: "bad".into(),
                score: -4.25431,
                count_a: 0.0,
                count_b: 10.0,
                prior: 5.0,
                stddev: 0.5,
            },
            WordScore {
                word: "=cmd".into(),
                score: 0.0004,
                count_a: 1.0,
                count_b: 1.0,
                prior: 1.0,
                stddev: 1.0,
            },
        ]
    }

    #[test]
    fn txt_uses_three_decimals() {
        let out = render_scores(&sample(), ExportFormat::Txt).unwrap();
        assert_eq!(out, "bad -4.254\n=cmd 0.000\n");
    }

    #[test]
    fn csv_escapes_formulas() {
        let out = render_scores(&sample(), ExportFormat::Csv).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("word,score,count_a,count_b,prior"));
        assert_eq!(lines.next(), Some("bad,-4.254,0,10,5"));
        assert_eq!(lines.next(), Some("'=cmd,0.000,1,1,1"));
    }

    #[test]
    fn export_errors_name_the_export() {
        let err = Error::Export(csv::Error::from(std::io::Error::other("disk full")));
        let msg = err.to_string();
        assert!(msg.starts_with("CSV export failed"), "{msg}");
        assert!(!msg.contains("descriptor table"));
    }

    #[test]
    fn json_is_an_array_of_objects() {
        let out = render_scores(&sample(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["word"], "bad");
        assert_eq!(arr[1]["prior"], 1.0);
    }
}
