//! Parser for the tagged-block (OFX/OFC) statement dialect.
//!
//! Expected shape, one block per transaction:
//!   <STMTTRN>
//!   <DTPOSTED>20251015
//!   <TRNAMT>-100.00
//!   <MEMO>Farmácia
//!   </STMTTRN>
//!
//! Only the first date/amount/memo tag inside a block counts. Blocks missing
//! both date and amount are dropped silently; a missing memo falls back to a
//! placeholder description.

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;

use crate::types::ParsedTransaction;

/// Description used when a block carries no memo tag.
pub const MISSING_DESCRIPTION: &str = "(no description)";

/// Parse tagged-block statement text into transactions, in document order.
///
/// `sequence_id` comes from a counter starting at 1, independent of where the
/// block sits in the source text. An empty result is not an error here; the
/// import workflow turns it into a "no transactions found" warning.
pub fn parse_tagged(text: &str) -> Result<Vec<ParsedTransaction>> {
    let block_re = Regex::new(r"(?is)<STMTTRN>(.*?)</STMTTRN>")?;
    let date_re = Regex::new(r"(?i)<DTPOSTED>\s*(\d{8})")?;
    let amount_re = Regex::new(r"(?i)<TRNAMT>\s*(-?\d+(?:[.,]\d+)?)")?;
    let memo_re = Regex::new(r"(?i)<MEMO>\s*([^<]+)")?;

    let mut txns = Vec::new();
    let mut sequence: u32 = 0;

    for caps in block_re.captures_iter(text) {
        let block = &caps[1];

        let date = date_re
            .captures(block)
            .and_then(|c| format_tag_date(&c[1]));
        let amount = amount_re
            .captures(block)
            .and_then(|c| c[1].replacen(',', ".", 1).parse::<f64>().ok());

        if date.is_none() && amount.is_none() {
            continue;
        }

        let memo = memo_re
            .captures(block)
            .map(|c| c[1].trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());

        sequence += 1;
        txns.push(ParsedTransaction::from_signed(
            sequence,
            date.unwrap_or_default(),
            memo,
            amount.unwrap_or(0.0),
        ));
    }

    Ok(txns)
}

/// `YYYYMMDD` → `YYYY-MM-DD`, rejecting calendar-invalid dates.
fn format_tag_date(raw: &str) -> Option<String> {
    let y: i32 = raw[0..4].parse().ok()?;
    let m: u32 = raw[4..6].parse().ok()?;
    let d: u32 = raw[6..8].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(y, m, d)?;
    Some(date.format("%Y-%m-%d").to_string())
}
