//! Sequence Source: Delimited Tables to State Sequences
//!
//! Reads a header-led delimited table (TSV by default), keeps the state
//! column, and deletes rows whose state is the error marker or missing.
//! Deletion bridges the gap, so `u, error, v` yields the transition u -> v.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Cell values treated as missing, in addition to the empty string
const MISSING_MARKERS: [&str; 6] = ["NaN", "nan", "NA", "N/A", "null", "NULL"];

fn default_state_column() -> String {
    "sub_cot".to_string()
}

fn default_time_column() -> String {
    "time".to_string()
}

fn default_delimiter() -> char {
    '\t'
}

fn default_error_marker() -> String {
    "error".to_string()
}

/// Column selection and row validity rules for the loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Column holding the state labels
    #[serde(default = "default_state_column")]
    pub state_column: String,
    /// Column holding the ordering key
    #[serde(default = "default_time_column")]
    pub time_column: String,
    /// Field separator
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// State value marking an invalid sample
    #[serde(default = "default_error_marker")]
    pub error_marker: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            state_column: default_state_column(),
            time_column: default_time_column(),
            delimiter: default_delimiter(),
            error_marker: default_error_marker(),
        }
    }
}

impl LoaderConfig {
    /// Same rules, different state column
    pub fn with_state_column(column: impl Into<String>) -> Self {
        Self {
            state_column: column.into(),
            ..Self::default()
        }
    }
}

/// Load a state sequence from a file on disk.
pub fn load_sequence(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let sequence = parse_sequence(file, config)?;
    debug!(path = %path.display(), len = sequence.len(), "loaded state sequence");
    Ok(sequence)
}

/// Parse a state sequence from any reader.
///
/// Both required columns are checked against the header before any row
/// is inspected. Rows are stably ordered by the time column: by numeric
/// value when any time cell parses as a number, with unparsable times kept
/// after them in file order; lexicographically when none parses.
pub fn parse_sequence<R: Read>(reader: R, config: &LoaderConfig) -> Result<Vec<String>> {
    let mut lines = BufReader::new(reader).lines();

    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line.map_err(|e| AnalysisError::io("<input>", e))?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(AnalysisError::EmptyInput),
        }
    };

    let columns: Vec<String> = split_row(&header, config.delimiter);
    let column_index = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AnalysisError::MissingColumn { column: name.to_string() })
    };
    let time_idx = column_index(&config.time_column)?;
    let state_idx = column_index(&config.state_column)?;

    let mut rows: Vec<(String, String)> = Vec::new();
    let mut dropped = 0usize;

    for line in lines {
        let line = line.map_err(|e| AnalysisError::io("<input>", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_row(&line, config.delimiter);
        let time = cells.get(time_idx).cloned().unwrap_or_default();

        match cells.get(state_idx) {
            Some(state) if !is_missing(state) && *state != config.error_marker => {
                rows.push((time, state.clone()));
            }
            _ => dropped += 1,
        }
    }

    let keys: Vec<Option<f64>> = rows
        .iter()
        .map(|(t, _)| t.trim().parse::<f64>().ok().filter(|k| !k.is_nan()))
        .collect();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    if keys.iter().any(Option::is_some) {
        // Unparsable times go last, in file order
        order.sort_by(|&a, &b| match (keys[a], keys[b]) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    } else {
        order.sort_by(|&a, &b| rows[a].0.cmp(&rows[b].0));
    }

    debug!(kept = rows.len(), dropped, column = %config.state_column, "parsed input table");
    Ok(order.into_iter().map(|i| rows[i].1.clone()).collect())
}

fn split_row(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|cell| {
            let cell = cell.trim();
            cell.strip_prefix('"')
                .and_then(|c| c.strip_suffix('"'))
                .unwrap_or(cell)
                .to_string()
        })
        .collect()
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "time\tsub_cot\tloc_cot\n\
                         1\tA\tX\n\
                         2\tB\tY\n\
                         3\tB\tY\n\
                         4\terror\tZ\n\
                         5\tC\tZ\n\
                         6\tA\tX\n";

    #[test]
    fn test_error_rows_are_bridged() {
        let seq = parse_sequence(TABLE.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(seq, vec!["A", "B", "B", "C", "A"]);
    }

    #[test]
    fn test_custom_column_checks_its_own_cells() {
        let config = LoaderConfig::with_state_column("loc_cot");
        let seq = parse_sequence(TABLE.as_bytes(), &config).unwrap();
        assert_eq!(seq, vec!["X", "Y", "Y", "Z", "Z", "X"]);
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let config = LoaderConfig::with_state_column("nope");
        let err = parse_sequence(TABLE.as_bytes(), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { ref column } if column == "nope"));

        let no_time = "step\tsub_cot\n1\tA\n";
        let err = parse_sequence(no_time.as_bytes(), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { ref column } if column == "time"));
    }

    #[test]
    fn test_missing_cells_dropped() {
        let table = "time\tsub_cot\n1\tA\n2\t\n3\tNaN\n4\n5\tB\n";
        let seq = parse_sequence(table.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(seq, vec!["A", "B"]);
    }

    #[test]
    fn test_rows_ordered_by_time() {
        let table = "time,sub_cot\n3,C\n1,A\n2,B\n10,D\n";
        let config = LoaderConfig {
            delimiter: ',',
            ..LoaderConfig::default()
        };
        let seq = parse_sequence(table.as_bytes(), &config).unwrap();
        assert_eq!(seq, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_bad_time_cell_keeps_numeric_order() {
        for bad in ["x", ""] {
            let mut table = String::from("time\tsub_cot\n");
            for t in 1..=12 {
                table.push_str(&format!("{}\tS{}\n", t, t));
            }
            table.push_str(&format!("{}\tZ\n", bad));

            let seq = parse_sequence(table.as_bytes(), &LoaderConfig::default()).unwrap();
            let expected: Vec<String> = (1..=12).map(|t| format!("S{}", t)).chain(["Z".to_string()]).collect();
            assert_eq!(seq, expected);
        }
    }

    #[test]
    fn test_unparsable_times_follow_numeric_in_file_order() {
        let table = "time\tsub_cot\nlate\tP\n2\tB\n\tQ\n1\tA\n";
        let seq = parse_sequence(table.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(seq, vec!["A", "B", "P", "Q"]);
    }

    #[test]
    fn test_text_times_sorted_lexicographically() {
        let table = "time\tsub_cot\n2024-01-03\tC\n2024-01-01\tA\n2024-01-02\tB\n";
        let seq = parse_sequence(table.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(seq, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_quoted_cells() {
        let table = "\"time\"\t\"sub_cot\"\n1\t\"A\"\n2\t\"B\"\n";
        let seq = parse_sequence(table.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(seq, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_input() {
        let err = parse_sequence("".as_bytes(), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }
}
