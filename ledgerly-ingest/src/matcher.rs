//! Heuristic header-column discovery for delimited statements.
//!
//! Export dialects disagree on header names ("Data", "Date", "Histórico",
//! "Description", "Valor", "Amount"...), so discovery is an ordered list of
//! (role, case-insensitive pattern) rules rather than exact names. Callers may
//! supply their own rule set to extend a dialect without touching the parser.

use anyhow::Result;
use regex::Regex;

/// Semantic role a header column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Date,
    Description,
    Amount,
}

/// Discovered column positions. A role missing from the header stays `None`
/// and the parser emits an empty string for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnIndexes {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub amount: Option<usize>,
}

/// Ordered (role, pattern) rules. For each role the first header index whose
/// name matches wins; later headers and later rules for the same role are
/// ignored.
pub struct ColumnRules {
    rules: Vec<(ColumnRole, Regex)>,
}

impl ColumnRules {
    pub fn from_patterns(patterns: &[(ColumnRole, &str)]) -> Result<Self> {
        let mut rules = Vec::with_capacity(patterns.len());
        for (role, pattern) in patterns {
            rules.push((*role, Regex::new(&format!("(?i){pattern}"))?));
        }
        Ok(Self { rules })
    }

    /// Default rule set: covers English and pt-BR bank export headers.
    pub fn defaults() -> Result<Self> {
        Self::from_patterns(&[
            (ColumnRole::Date, "date|data"),
            (ColumnRole::Description, "desc|hist"),
            (ColumnRole::Amount, "amount|valor|value"),
        ])
    }

    pub fn discover(&self, headers: &[String]) -> ColumnIndexes {
        let mut found = ColumnIndexes::default();
        for (role, pattern) in &self.rules {
            let slot = match role {
                ColumnRole::Date => &mut found.date,
                ColumnRole::Description => &mut found.description,
                ColumnRole::Amount => &mut found.amount,
            };
            if slot.is_some() {
                continue;
            }
            *slot = headers.iter().position(|h| pattern.is_match(h.trim()));
        }
        found
    }
}
