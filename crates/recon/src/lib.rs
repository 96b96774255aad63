//! `conciliador-recon`: bank vs. sales ledger reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns matched pairs and
//! the pending remainder of each side. No filesystem access, no clock.

pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod source;

pub use config::{ColumnMapping, ConfigFile, ReconConfig, ToleranceConfig};
pub use detect::detect_columns;
pub use engine::{reconcile, reconcile_with};
pub use error::ReconError;
pub use matcher::{GreedyFirstMatch, MatchStrategy};
pub use model::{CellValue, MatchType, MatchedPair, ReconResult, ReconSummary, Record, Table};
