//! Statement dialect detection by filename extension.
//!
//! Runs before any file content is read: an unsupported extension halts the
//! pipeline with an error naming the accepted set.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// The two supported statement export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementDialect {
    /// Comma/semicolon-delimited tabular text (`.csv`).
    DelimitedText,
    /// SGML-like tagged blocks (`.ofx`, `.ofc`).
    TaggedBlock,
}

/// Extensions accepted by [`detect_dialect`], lower-cased, without the dot.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "ofx", "ofc"];

/// Classify a filename by its lower-cased extension.
pub fn detect_dialect(filename: &str) -> Result<StatementDialect> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(StatementDialect::DelimitedText),
        "ofx" | "ofc" => Ok(StatementDialect::TaggedBlock),
        _ => bail!(
            "unsupported file format for {:?}: accepted extensions are .csv, .ofx, .ofc",
            filename
        ),
    }
}
