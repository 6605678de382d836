//! Embedded Engine Capability Traits
//!
//! This module defines the narrow capability seam between the connection
//! state machine and the embedded database engine. The client only ever
//! needs two things from the engine: open a connection (to a path or in
//! memory) and run SQL on it. Everything backend-specific (extension
//! installs, secrets, attaches) is plain SQL issued through that seam.
//!
//! Keeping the seam this small lets the connection-lifecycle logic be unit
//! tested against a recording fake without linking the real engine.
//!
//! # Implementations
//! - [`duckdb::DuckDbEngine`] - the real engine over the `duckdb` crate

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod duckdb;

/// A structured query result
///
/// Column order and the engine-reported type identifiers are preserved
/// exactly; downstream formatting and callers assert on both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, in result-set order
    pub columns: Vec<String>,

    /// Declared column type identifiers, parallel to `columns`
    pub column_types: Vec<String>,

    /// Result rows; each row is in column order
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// An empty result with no columns (e.g. from a bare statement)
    #[must_use]
    pub fn empty() -> Self {
        Self { columns: Vec::new(), column_types: Vec::new(), rows: Vec::new() }
    }
}

/// A live engine connection
///
/// Dropping the value closes the connection; there is no explicit close.
pub trait EngineConn {
    /// Run a statement and capture the full result set with column metadata
    fn run(&self, sql: &str) -> Result<QueryResult>;

    /// Execute a statement for its effect, discarding any result
    fn exec(&self, sql: &str) -> Result<()>;
}

/// Database engine factory
///
/// One implementor per engine. Connections are blocking; every call
/// completes or fails before returning.
pub trait Engine {
    /// Connection handle type produced by this engine
    type Conn: EngineConn;

    /// Open a connection to the given path with the requested access mode
    fn connect(&self, path: &str, read_only: bool) -> Result<Self::Conn>;

    /// Open a connection to a fresh in-memory instance
    fn connect_in_memory(&self) -> Result<Self::Conn>;
}
