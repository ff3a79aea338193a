//! Wizard state machine for the statement import workflow.
//!
//! Upload → Review → Categorize, with explicit transition methods guarded by
//! the current stage. All parsing and categorization is local; the single
//! backend-visible side effect for the batch is the commit call, behind a
//! confirmation gate when transactions are still uncategorized.

use anyhow::{Context, Result, bail};
use ledgerly_ingest::{StatementDialect, detect_dialect, parse_delimited, parse_tagged};

use crate::backend::ImportBackend;
use crate::categories;
use crate::session::{ImportSession, WizardStage};

/// Result of a file upload attempt. A rejected extension or read error is an
/// `Err` from [`ImportCoordinator::begin_upload`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Parsing produced `count` transactions; the wizard is now at Review.
    Advanced { count: usize },
    /// Parsing succeeded but nothing survived. Warning, not an error: the
    /// wizard stays at Upload and no session exists.
    NoTransactions,
}

/// Result of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The batch was submitted and the session discarded.
    Committed { count: usize },
    /// `uncategorized` transactions still have no category; the operator must
    /// confirm explicitly. No side effects happened.
    NeedsConfirmation { uncategorized: usize },
}

/// Owns the one active [`ImportSession`] and the backend collaborator.
pub struct ImportCoordinator<B: ImportBackend> {
    backend: B,
    session: Option<ImportSession>,
}

impl<B: ImportBackend> ImportCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: None,
        }
    }

    /// Current wizard stage. Upload whenever no session exists.
    pub fn stage(&self) -> WizardStage {
        self.session
            .as_ref()
            .map(|s| s.stage)
            .unwrap_or(WizardStage::Upload)
    }

    pub fn session(&self) -> Option<&ImportSession> {
        self.session.as_ref()
    }

    /// Parse an uploaded file and, when at least one transaction survives,
    /// advance to Review. Selecting a new file discards any prior session.
    ///
    /// Errors (unsupported extension, unreadable content) leave the wizard at
    /// Upload with no session created.
    pub fn begin_upload(&mut self, filename: &str, content: &str) -> Result<UploadOutcome> {
        self.session = None;

        let dialect = detect_dialect(filename)?;
        let transactions = match dialect {
            StatementDialect::DelimitedText => parse_delimited(content)?,
            StatementDialect::TaggedBlock => parse_tagged(content)?,
        };

        if transactions.is_empty() {
            return Ok(UploadOutcome::NoTransactions);
        }

        let count = transactions.len();
        self.session = Some(ImportSession::new(filename, dialect, transactions));
        Ok(UploadOutcome::Advanced { count })
    }

    /// Review → Categorize, on operator confirmation.
    pub fn confirm_review(&mut self) -> Result<()> {
        let session = self.active_session_mut()?;
        match session.stage {
            WizardStage::Review => {
                session.stage = WizardStage::Categorize;
                Ok(())
            }
            stage => bail!("cannot confirm review from the {stage:?} step"),
        }
    }

    /// Categorize → Review, keeping parsed data and assignments.
    pub fn back_to_review(&mut self) -> Result<()> {
        let session = self.active_session_mut()?;
        match session.stage {
            WizardStage::Categorize => {
                session.stage = WizardStage::Review;
                Ok(())
            }
            stage => bail!("cannot go back to review from the {stage:?} step"),
        }
    }

    /// Discard the session. Valid from any stage; also models navigating away.
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Set the category of one transaction. Session-local, no backend call.
    pub fn assign_category(&mut self, sequence_id: u32, label: &str) -> Result<()> {
        let session = self.active_session_mut()?;
        if !categories::assign(session, sequence_id, label) {
            bail!("no transaction with sequence id {sequence_id}");
        }
        Ok(())
    }

    /// Define an ad-hoc category and push it to the backend.
    ///
    /// The local addition is kept even when the remote create fails; the error
    /// propagates so the operator sees the notification.
    pub async fn define_category(&mut self, name: &str) -> Result<()> {
        let session = self.active_session_mut()?;
        categories::define_local(session, name);
        self.backend.create_category(name).await
    }

    /// Backend registry plus this session's ad-hoc names.
    pub async fn candidate_categories(&self) -> Result<Vec<String>> {
        let registry = self.backend.list_categories().await?;
        match &self.session {
            Some(session) => Ok(categories::candidates(&registry, session)),
            None => Ok(registry),
        }
    }

    pub fn uncategorized_count(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.uncategorized_count())
            .unwrap_or(0)
    }

    /// Commit gate. Only valid at Categorize.
    ///
    /// With uncategorized transactions and `confirmed == false`, returns
    /// [`CommitOutcome::NeedsConfirmation`] without side effects. Otherwise
    /// submits the whole batch in one backend call; on remote failure the
    /// session stays at Categorize so the same commit can be retried.
    pub async fn commit(&mut self, ledger_id: &str, confirmed: bool) -> Result<CommitOutcome> {
        let session = self
            .session
            .as_ref()
            .context("no active import session")?;
        match session.stage {
            WizardStage::Categorize => {}
            stage => bail!("cannot commit from the {stage:?} step"),
        }

        let uncategorized = session.uncategorized_count();
        if uncategorized > 0 && !confirmed {
            return Ok(CommitOutcome::NeedsConfirmation { uncategorized });
        }

        self.backend
            .import_batch(ledger_id, &session.transactions)
            .await?;

        let count = session.transactions.len();
        self.session = None;
        Ok(CommitOutcome::Committed { count })
    }

    fn active_session_mut(&mut self) -> Result<&mut ImportSession> {
        self.session.as_mut().context("no active import session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerly_ingest::ParsedTransaction;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockBackend {
        registry: Vec<String>,
        fail_create: bool,
        fail_import: bool,
        created: Mutex<Vec<String>>,
        import_calls: AtomicUsize,
        last_batch: Mutex<Vec<ParsedTransaction>>,
        last_ledger: Mutex<String>,
    }

    impl ImportBackend for MockBackend {
        async fn list_categories(&self) -> Result<Vec<String>> {
            Ok(self.registry.clone())
        }

        async fn create_category(&self, name: &str) -> Result<()> {
            if self.fail_create {
                bail!("create rejected");
            }
            self.created.lock().unwrap().push(name.to_string());
            Ok(())
        }

        async fn import_batch(&self, ledger_id: &str, batch: &[ParsedTransaction]) -> Result<()> {
            self.import_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_import {
                bail!("import rejected");
            }
            *self.last_batch.lock().unwrap() = batch.to_vec();
            *self.last_ledger.lock().unwrap() = ledger_id.to_string();
            Ok(())
        }
    }

    const CSV: &str =
        "Data,Descrição,Valor\n2025-10-15,Supermercado,-234.50\n2025-10-14,Salário,5000.00";

    fn coordinator() -> ImportCoordinator<MockBackend> {
        ImportCoordinator::new(MockBackend::default())
    }

    fn at_categorize() -> ImportCoordinator<MockBackend> {
        let mut c = coordinator();
        c.begin_upload("extrato.csv", CSV).unwrap();
        c.confirm_review().unwrap();
        c
    }

    #[test]
    fn test_upload_advances_to_review() {
        let mut c = coordinator();
        let outcome = c.begin_upload("extrato.csv", CSV).unwrap();
        assert_eq!(outcome, UploadOutcome::Advanced { count: 2 });
        assert_eq!(c.stage(), WizardStage::Review);
        assert_eq!(c.session().unwrap().transactions.len(), 2);
    }

    #[test]
    fn test_unsupported_extension_creates_no_session() {
        let mut c = coordinator();
        let err = c.begin_upload("extrato.pdf", CSV).unwrap_err();
        assert!(err.to_string().contains(".csv"));
        assert_eq!(c.stage(), WizardStage::Upload);
        assert!(c.session().is_none());
    }

    #[test]
    fn test_empty_tagged_file_is_warning_and_stays_at_upload() {
        let mut c = coordinator();
        let outcome = c
            .begin_upload("extrato.ofx", "OFXHEADER:100\nno blocks here\n")
            .unwrap();
        assert_eq!(outcome, UploadOutcome::NoTransactions);
        assert_eq!(c.stage(), WizardStage::Upload);
        assert!(c.session().is_none());
    }

    #[test]
    fn test_reupload_discards_prior_session() {
        let mut c = coordinator();
        c.begin_upload("extrato.csv", CSV).unwrap();
        c.assign_category(2, "Mercado").unwrap();
        c.begin_upload("extrato2.csv", CSV).unwrap();
        assert_eq!(c.uncategorized_count(), 2);
        assert_eq!(c.session().unwrap().filename, "extrato2.csv");
    }

    #[test]
    fn test_review_confirmation_advances_and_back_retains_data() {
        let mut c = at_categorize();
        assert_eq!(c.stage(), WizardStage::Categorize);
        c.assign_category(2, "Mercado").unwrap();

        c.back_to_review().unwrap();
        assert_eq!(c.stage(), WizardStage::Review);
        // Assignments survive the round trip
        c.confirm_review().unwrap();
        assert_eq!(c.uncategorized_count(), 1);
    }

    #[test]
    fn test_transition_guards_reject_wrong_stage() {
        let mut c = coordinator();
        assert!(c.confirm_review().is_err());
        assert!(c.back_to_review().is_err());

        c.begin_upload("extrato.csv", CSV).unwrap();
        // back is only valid from Categorize
        assert!(c.back_to_review().is_err());
        c.confirm_review().unwrap();
        // confirm is only valid from Review
        assert!(c.confirm_review().is_err());
    }

    #[test]
    fn test_cancel_discards_session_from_any_stage() {
        let mut c = coordinator();
        c.cancel();
        assert_eq!(c.stage(), WizardStage::Upload);

        c.begin_upload("extrato.csv", CSV).unwrap();
        c.cancel();
        assert_eq!(c.stage(), WizardStage::Upload);
        assert!(c.session().is_none());

        let mut c = at_categorize();
        c.cancel();
        assert_eq!(c.stage(), WizardStage::Upload);
    }

    #[tokio::test]
    async fn test_commit_gate_blocks_unconfirmed_commit() {
        let mut c = at_categorize();
        let outcome = c.commit("ledger-1", false).await.unwrap();
        assert_eq!(outcome, CommitOutcome::NeedsConfirmation { uncategorized: 2 });
        assert_eq!(c.stage(), WizardStage::Categorize);
        assert_eq!(c.backend.import_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_declined_commit_with_partial_categories() {
        // 2 transactions, 1 uncategorized, operator declines
        let mut c = at_categorize();
        c.assign_category(2, "Mercado").unwrap();
        let outcome = c.commit("ledger-1", false).await.unwrap();
        assert_eq!(outcome, CommitOutcome::NeedsConfirmation { uncategorized: 1 });
        assert_eq!(c.backend.import_calls.load(Ordering::SeqCst), 0);
        assert_eq!(c.stage(), WizardStage::Categorize);
    }

    #[tokio::test]
    async fn test_confirmed_commit_submits_once_and_ends_session() {
        let mut c = at_categorize();
        let outcome = c.commit("ledger-1", true).await.unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { count: 2 });
        assert_eq!(c.backend.import_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.stage(), WizardStage::Upload);
        assert!(c.session().is_none());
        assert_eq!(*c.backend.last_ledger.lock().unwrap(), "ledger-1");
    }

    #[tokio::test]
    async fn test_fully_categorized_commit_needs_no_confirmation() {
        let mut c = at_categorize();
        c.assign_category(2, "Mercado").unwrap();
        c.assign_category(3, "Renda").unwrap();
        let outcome = c.commit("ledger-1", false).await.unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { count: 2 });

        let batch = c.backend.last_batch.lock().unwrap();
        assert_eq!(batch.len(), 2);
        // Parse order preserved end to end, categories included
        assert_eq!(batch[0].description, "Supermercado");
        assert_eq!(batch[0].category, "Mercado");
        assert_eq!(batch[1].category, "Renda");
    }

    #[tokio::test]
    async fn test_remote_import_failure_keeps_categorize_for_retry() {
        let mut c = ImportCoordinator::new(MockBackend {
            fail_import: true,
            ..Default::default()
        });
        c.begin_upload("extrato.csv", CSV).unwrap();
        c.confirm_review().unwrap();

        assert!(c.commit("ledger-1", true).await.is_err());
        assert_eq!(c.stage(), WizardStage::Categorize);
        assert_eq!(c.backend.import_calls.load(Ordering::SeqCst), 1);

        // Retry reaches the backend again with the same session
        assert!(c.commit("ledger-1", true).await.is_err());
        assert_eq!(c.backend.import_calls.load(Ordering::SeqCst), 2);
        assert_eq!(c.session().unwrap().transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_commit_outside_categorize_is_rejected() {
        let mut c = coordinator();
        assert!(c.commit("ledger-1", true).await.is_err());

        c.begin_upload("extrato.csv", CSV).unwrap();
        assert!(c.commit("ledger-1", true).await.is_err());
        assert_eq!(c.backend.import_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_define_category_pushes_to_backend() {
        let mut c = at_categorize();
        c.define_category("Pets").await.unwrap();
        assert_eq!(*c.backend.created.lock().unwrap(), ["Pets"]);
        assert_eq!(c.session().unwrap().local_categories, ["Pets"]);
    }

    #[tokio::test]
    async fn test_define_category_failure_keeps_local_entry() {
        let mut c = ImportCoordinator::new(MockBackend {
            registry: vec!["Mercado".to_string()],
            fail_create: true,
            ..Default::default()
        });
        c.begin_upload("extrato.csv", CSV).unwrap();
        c.confirm_review().unwrap();

        assert!(c.define_category("Pets").await.is_err());
        // Not rolled back: the name stays selectable this session
        assert_eq!(c.session().unwrap().local_categories, ["Pets"]);
        let candidates = c.candidate_categories().await.unwrap();
        assert_eq!(candidates, ["Mercado", "Pets"]);
    }

    #[tokio::test]
    async fn test_candidate_categories_without_session() {
        let c = ImportCoordinator::new(MockBackend {
            registry: vec!["Mercado".to_string()],
            ..Default::default()
        });
        assert_eq!(c.candidate_categories().await.unwrap(), ["Mercado"]);
    }
}
