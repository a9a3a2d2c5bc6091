use crate::logical::NamingPhase;
use thiserror::Error;

/// Failure to name one relationship. The rest of the run is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    #[error("foreign key {constraint}: parent table {parent} not found")]
    ParentTableMissing { constraint: String, parent: String },
    #[error("foreign key {constraint}: no reverse entry on parent table {parent}")]
    ReverseKeyMissing { constraint: String, parent: String },
    #[error("foreign key {constraint}: {count} reverse entries on parent table {parent}")]
    DuplicateReverseKey {
        constraint: String,
        parent: String,
        count: usize,
    },
}

impl RelationError {
    /// An inconsistent input schema, as opposed to a skippable gap.
    pub fn is_schema_violation(&self) -> bool {
        !matches!(self, Self::ParentTableMissing { .. })
    }
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("table {table} is {found:?}; all tables need named columns before relationships")]
    PhaseOrder { table: String, found: NamingPhase },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
