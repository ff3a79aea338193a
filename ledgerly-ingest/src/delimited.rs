//! Parser for the delimited-text statement dialect.
//!
//! The export shape is only loosely defined, so the header is matched
//! heuristically, malformed rows are skipped rather than reported, and only
//! the surviving transaction count surfaces to the operator.
//!
//! Expected shape (delimiter may also be `;`, decimal separator may be `,`):
//!   Data,Descrição,Valor
//!   2025-10-15,Supermercado,-234.50
//!   2025-10-14,Salário,5000.00

use anyhow::{Context, Result};

use crate::matcher::ColumnRules;
use crate::types::ParsedTransaction;

/// Parse delimited statement text with the default header rules.
pub fn parse_delimited(text: &str) -> Result<Vec<ParsedTransaction>> {
    let rules = ColumnRules::defaults()?;
    parse_delimited_with(text, &rules)
}

/// Parse delimited statement text with caller-supplied header rules.
///
/// Rows with fewer than 3 fields or an unparsable amount are dropped
/// silently. Output order matches input row order; `sequence_id` is the
/// 1-based row index counting the header row.
pub fn parse_delimited_with(text: &str, rules: &ColumnRules) -> Result<Vec<ParsedTransaction>> {
    let delimiter = sniff_delimiter(text);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut txns = Vec::new();
    let mut columns = None;
    let mut row_index: u32 = 0;

    for result in rdr.records() {
        let record = result.context("reading delimited statement row")?;
        row_index += 1;

        // First surviving row is the header; discover columns from it.
        let cols = match columns {
            Some(c) => c,
            None => {
                let headers: Vec<String> = record.iter().map(|f| f.to_string()).collect();
                columns = Some(rules.discover(&headers));
                continue;
            }
        };

        if record.len() < 3 {
            continue;
        }

        let raw_amount = cols.amount.and_then(|i| record.get(i));
        let Some(original_amount) = raw_amount.and_then(normalize_amount) else {
            continue;
        };

        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|f| f.trim().to_string())
                .unwrap_or_default()
        };

        txns.push(ParsedTransaction::from_signed(
            row_index,
            field(cols.date),
            field(cols.description),
            original_amount,
        ));
    }

    Ok(txns)
}

/// Semicolon exports exist alongside comma ones; sniff from the header line.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header.contains(';') { b';' } else { b',' }
}

/// Interpret a loosely formatted monetary string as a signed number.
///
/// Strips everything but digits, minus, comma and dot, then treats the first
/// comma as the decimal separator ("1234,56" → 1234.56).
fn normalize_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | ',' | '.'))
        .collect();
    cleaned.replacen(',', ".", 1).parse().ok()
}
