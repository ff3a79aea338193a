//! ledgerly-import: import session, category mapping, the wizard state
//! machine, and the backend collaborator client.

pub mod backend;
pub mod categories;
pub mod coordinator;
pub mod http;
pub mod session;

pub use backend::ImportBackend;
pub use coordinator::{CommitOutcome, ImportCoordinator, UploadOutcome};
pub use http::HttpBackend;
pub use session::{ImportSession, WizardStage};
