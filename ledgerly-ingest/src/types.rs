use serde::{Deserialize, Serialize};

/// Whether a statement line moves money in or out of the account.
///
/// Derived purely from the sign of the parsed figure: negative is an expense,
/// zero and positive are income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn of(signed: f64) -> Direction {
        if signed < 0.0 {
            Direction::Expense
        } else {
            Direction::Income
        }
    }
}

/// Normalized output of the statement parsers (dialect-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// 1-based position within one import session. Stable for the session,
    /// not unique across sessions.
    pub sequence_id: u32,
    /// Verbatim from delimited sources; `YYYY-MM-DD` for tagged-block sources.
    pub date: String,
    pub description: String,
    /// Magnitude; always `original_amount.abs()`.
    pub amount: f64,
    /// Signed figure as parsed, kept for auditing.
    pub original_amount: f64,
    pub direction: Direction,
    /// Empty string means "not yet assigned by the operator". The only field
    /// that may change after parsing.
    pub category: String,
}

impl ParsedTransaction {
    /// Build a normalized record from a signed amount.
    pub fn from_signed(
        sequence_id: u32,
        date: impl Into<String>,
        description: impl Into<String>,
        original_amount: f64,
    ) -> Self {
        Self {
            sequence_id,
            date: date.into(),
            description: description.into(),
            amount: original_amount.abs(),
            original_amount,
            direction: Direction::of(original_amount),
            category: String::new(),
        }
    }

    /// Recompute `amount` and `direction` from `original_amount`.
    ///
    /// Idempotent: only `original_amount` is read, so applying this to an
    /// already-normalized record changes nothing.
    pub fn normalize(&mut self) {
        self.amount = self.original_amount.abs();
        self.direction = Direction::of(self.original_amount);
    }

    pub fn is_categorized(&self) -> bool {
        !self.category.is_empty()
    }
}
