//! In-memory aggregate for one upload-to-commit wizard run.

use ledgerly_ingest::{Direction, ParsedTransaction, StatementDialect};
use serde::{Deserialize, Serialize};

/// The three wizard steps. Terminal outcomes (committed, cancelled) are not
/// stages: both discard the session entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStage {
    Upload,
    Review,
    Categorize,
}

/// One import run: created on a successful parse, dropped on commit, cancel,
/// or when a new file is selected. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSession {
    pub stage: WizardStage,
    pub filename: String,
    pub dialect: StatementDialect,
    /// Parse order, preserved end to end.
    pub transactions: Vec<ParsedTransaction>,
    /// Categories defined by the operator mid-session, not yet known to be in
    /// the backend registry.
    pub local_categories: Vec<String>,
}

impl ImportSession {
    /// A session starts at Review: it only exists once parsing succeeded.
    pub fn new(
        filename: impl Into<String>,
        dialect: StatementDialect,
        transactions: Vec<ParsedTransaction>,
    ) -> Self {
        Self {
            stage: WizardStage::Review,
            filename: filename.into(),
            dialect,
            transactions,
            local_categories: Vec::new(),
        }
    }

    pub fn find_mut(&mut self, sequence_id: u32) -> Option<&mut ParsedTransaction> {
        self.transactions
            .iter_mut()
            .find(|t| t.sequence_id == sequence_id)
    }

    pub fn uncategorized_count(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| !t.is_categorized())
            .count()
    }

    /// Income/expense subtotals for the review summary.
    pub fn totals(&self) -> (f64, f64) {
        let mut income = 0.0;
        let mut expense = 0.0;
        for t in &self.transactions {
            match t.direction {
                Direction::Income => income += t.amount,
                Direction::Expense => expense += t.amount,
            }
        }
        (income, expense)
    }
}
