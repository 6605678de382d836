//! Database Address Resolution
//!
//! This module classifies an opaque database address into a backend kind and
//! normalizes it into the form the engine expects. It is a pure string
//! function: no I/O happens here, which keeps it independently testable.
//!
//! # Classification Order
//! Prefixes are checked from most specific to least specific:
//! 1. `r2://` - Cloudflare R2 object storage (before `s3://`, the more
//!    specific scheme wins)
//! 2. `s3://` - S3 object storage
//! 3. `md:` - MotherDuck cloud warehouse (requires a token)
//! 4. `:memory:` - in-memory DuckDB instance
//! 5. anything else - local DuckDB file path, used verbatim

use serde::{Deserialize, Serialize};

use crate::error::{DuckgateError, Result};

/// Environment variable consulted for the MotherDuck token when no explicit
/// token is supplied. Lowercase, matching the variable MotherDuck documents.
pub const MOTHERDUCK_TOKEN_ENV: &str = "motherduck_token";

/// Supported database backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local DuckDB database (file path or `:memory:`)
    DuckDb,
    /// MotherDuck cloud warehouse (`md:` scheme)
    MotherDuck,
    /// S3-backed database attached over `s3://`
    S3,
    /// Cloudflare R2-backed database attached over `r2://`
    R2,
}

impl BackendKind {
    /// Get the backend name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DuckDb => "duckdb",
            Self::MotherDuck => "motherduck",
            Self::S3 => "s3",
            Self::R2 => "r2",
        }
    }

    /// Whether this backend is reached through object storage
    ///
    /// Object-store backends are always attached read-only and reject an
    /// explicit read-only connection request as contradictory.
    #[must_use]
    pub const fn is_object_store(&self) -> bool {
        matches!(self, Self::S3 | Self::R2)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A database address after classification
///
/// Immutable once resolved; the backend kind of a client never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Normalized address handed to the engine. For MotherDuck this embeds
    /// the token (and SaaS-mode marker) as query parameters.
    pub path: String,

    /// Classified backend kind
    pub kind: BackendKind,
}

/// Resolve a raw database address into a normalized path and backend kind
///
/// For `md:` addresses a non-empty token is required, taken from the
/// `motherduck_token` argument first and the `motherduck_token` environment
/// variable second. A missing token is a [`DuckgateError::ConfigError`];
/// no connection attempt is made.
///
/// The token ends up embedded in the returned path and must not be logged.
pub fn resolve(db_path: &str, motherduck_token: Option<&str>, saas_mode: bool) -> Result<ResolvedAddress> {
    // R2 before S3: the more specific scheme is checked first
    if db_path.starts_with("r2://") {
        return Ok(ResolvedAddress { path: db_path.to_string(), kind: BackendKind::R2 });
    }

    if db_path.starts_with("s3://") {
        return Ok(ResolvedAddress { path: db_path.to_string(), kind: BackendKind::S3 });
    }

    if db_path.starts_with("md:") {
        let token = motherduck_token
            .map(str::to_string)
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(MOTHERDUCK_TOKEN_ENV).ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                DuckgateError::config_error(format!(
                    "Please set the `{MOTHERDUCK_TOKEN_ENV}` environment variable or pass \
                     the token as an argument when using `md:` as the database path"
                ))
            })?;

        let path = if saas_mode {
            format!("{db_path}?motherduck_token={token}&saas_mode=true")
        } else {
            format!("{db_path}?motherduck_token={token}")
        };

        return Ok(ResolvedAddress { path, kind: BackendKind::MotherDuck });
    }

    // ":memory:" and plain file paths are both local DuckDB; the engine
    // itself distinguishes the in-memory form.
    Ok(ResolvedAddress { path: db_path.to_string(), kind: BackendKind::DuckDb })
}
