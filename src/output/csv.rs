//! CSV output formatter for most-similar results.
//!
//! One row is generated for each report row.
//!
//! # Columns
//!
//! - `file`: Masked path of the file
//! - `most_similar`: Masked path of its best match (empty if none)
//! - `score`: Similarity with 8 decimals
//! - `pair_id`: Identifier shared by rows describing the same pair
//!
//! # Example
//!
//! ```
//! use textmatch::output::{CsvOutput, DisplayRow};
//!
//! let rows = vec![DisplayRow {
//!     file: ".../a.txt".into(),
//!     most_similar: ".../b.txt".into(),
//!     score: 0.5,
//!     pair_id: 1,
//! }];
//! let csv = CsvOutput::new(&rows).to_string().unwrap();
//! assert_eq!(csv, "file,most_similar,score,pair_id\n.../a.txt,.../b.txt,0.50000000,1\n");
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use super::{format_score, DisplayRow};

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The output file could not be created.
    #[error("Failed to open {path} for writing: {source}")]
    Create {
        /// Target path
        path: std::path::PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    file: &'a str,
    most_similar: &'a str,
    score: String,
    pair_id: usize,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    rows: &'a [DisplayRow],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(rows: &'a [DisplayRow]) -> Self {
        Self { rows }
    }

    /// Write the CSV output to the given writer.
    ///
    /// The header is written even when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(["file", "most_similar", "score", "pair_id"])?;

        for row in self.rows {
            csv_writer.serialize(CsvRow {
                file: &row.file,
                most_similar: &row.most_similar,
                score: format_score(row.score),
                pair_id: row.pair_id,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the CSV output to a file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> Result<(), CsvOutputError> {
        let file = File::create(path).map_err(|source| CsvOutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(io::BufWriter::new(file))
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
