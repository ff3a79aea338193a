//! Backend collaborator seam.
//!
//! The import core only consumes these three operations; everything else the
//! REST backend exposes (plans, users, payments, ...) is out of scope here.

use anyhow::Result;
use ledgerly_ingest::ParsedTransaction;

/// REST collaborator for categories and the bulk import call.
///
/// The coordinator is generic over this trait; tests substitute an in-memory
/// mock, production uses [`crate::http::HttpBackend`].
#[allow(async_fn_in_trait)]
pub trait ImportBackend {
    /// Existing category names available for assignment.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// Create one category. Only success/failure is interpreted.
    async fn create_category(&self, name: &str) -> Result<()>;

    /// Submit the whole committed batch for one ledger in a single call.
    /// All-or-nothing from this side; the backend owns batch integrity.
    async fn import_batch(&self, ledger_id: &str, batch: &[ParsedTransaction]) -> Result<()>;
}
