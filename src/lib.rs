//! Duckgate - Uniform Database Connection Resolver and Query Executor
//!
//! Duckgate presents a single interface over four backend modes of the
//! DuckDB engine family: a local database file (or in-memory instance), the
//! MotherDuck cloud warehouse, and S3/R2 object-store attachments. A caller
//! hands over one connection-string-like address and gets consistent query
//! results regardless of which backend that address resolves to.
//!
//! # Architecture
//! - [`resolver`] - pure address classification, no I/O
//! - [`client`] - the connection-lifecycle state machine and query executor
//! - [`engine`] - the capability seam over the embedded engine, with the
//!   real DuckDB implementation in [`engine::duckdb`]
//! - [`output`] - JSON and table rendering of structured results
//! - [`error`] - error taxonomy with stable codes
//!
//! # Example
//! ```no_run
//! use duckgate::{ClientSettings, DatabaseClient};
//!
//! let client = DatabaseClient::connect(ClientSettings {
//!     db_path: Some(":memory:".to_string()),
//!     ..ClientSettings::default()
//! })?;
//! let result = client.execute("SELECT 1 AS x")?;
//! assert_eq!(result.columns, vec!["x"]);
//! # Ok::<(), duckgate::DuckgateError>(())
//! ```

pub mod client;
pub mod engine;
pub mod error;
pub mod output;
pub mod resolver;

// Re-export commonly used types for convenience
pub use client::{ClientSettings, ConnectionPolicy, DatabaseClient};
pub use engine::duckdb::DuckDbEngine;
pub use engine::{Engine, EngineConn, QueryResult};
pub use error::{DuckgateError, Result};
pub use resolver::{resolve, BackendKind, ResolvedAddress};
