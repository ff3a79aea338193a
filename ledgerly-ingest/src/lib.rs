//! ledgerly-ingest: statement dialect detection and parsers (CSV, OFX/OFC)
//! producing canonical transactions.

pub mod delimited;
pub mod detect;
pub mod matcher;
pub mod tagged;
pub mod types;

pub use delimited::{parse_delimited, parse_delimited_with};
pub use detect::{ACCEPTED_EXTENSIONS, StatementDialect, detect_dialect};
pub use matcher::{ColumnIndexes, ColumnRole, ColumnRules};
pub use tagged::{MISSING_DESCRIPTION, parse_tagged};
pub use types::{Direction, ParsedTransaction};
