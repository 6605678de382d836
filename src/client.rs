//! Database Client and Connection Lifecycle
//!
//! This module drives the backend-specific initialization protocol and owns
//! the one long-lived connection (or none, in ephemeral mode). A client is
//! constructed once per process, resolves its address exactly once, and
//! after that only exposes query execution.
//!
//! # Connection Modes
//! - `Persistent`: one handle held for the client's lifetime (MotherDuck,
//!   writable local databases, object-store attachments)
//! - `Ephemeral`: no held handle; each query opens a short-lived read-only
//!   connection (local read-only databases). Initialization still probes the
//!   database once so a bad path fails at startup rather than on first query.
//!
//! # Object-Store Attachments
//! S3 and R2 databases are mounted into a fresh in-memory instance through
//! the httpfs extension, always as a read-only attachment. Requesting an
//! explicit read-only connection for them is rejected as contradictory
//! before any connection attempt.

use tracing::{error, info};

use crate::engine::duckdb::DuckDbEngine;
use crate::engine::{Engine, EngineConn, QueryResult};
use crate::error::{DuckgateError, Result};
use crate::output;
use crate::resolver::{resolve, BackendKind, ResolvedAddress};

/// Connection configuration supplied once at construction
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// Raw database address; `None` falls back to an in-memory instance
    pub db_path: Option<String>,

    /// Explicit MotherDuck token; the `motherduck_token` environment
    /// variable is consulted when absent
    pub motherduck_token: Option<String>,

    /// Home directory override for the engine's config/cache location.
    /// Applied by setting the `HOME` environment variable once at
    /// construction; this is process-wide and never reset.
    pub home_dir: Option<String>,

    /// Connect to MotherDuck in SaaS mode
    pub saas_mode: bool,

    /// Open local databases read-only (ephemeral connection mode)
    pub read_only: bool,

    /// Format query output as JSON instead of a table
    pub json_output: bool,
}

/// Immutable per-client connection policy
#[derive(Debug, Clone, Copy)]
pub struct ConnectionPolicy {
    pub read_only: bool,
    pub json_output: bool,
    pub saas_mode: bool,
}

/// How the client reaches the engine after initialization
///
/// An explicit enum rather than `Option<Conn>` so the no-handle state is a
/// typed, checked condition.
enum ConnectionMode<C> {
    /// One handle held for the client's lifetime
    Persistent(C),
    /// No held handle; every query opens its own short-lived connection
    Ephemeral,
}

/// A resolved database client bound to one backend
///
/// Holds at most one live connection. Not safe for unsynchronized
/// concurrent use; serialize access or construct one client per caller.
pub struct DatabaseClient<E: Engine = DuckDbEngine> {
    engine: E,
    address: ResolvedAddress,
    policy: ConnectionPolicy,
    mode: ConnectionMode<E::Conn>,
}

impl<E: Engine> std::fmt::Debug for DatabaseClient<E> {
    // Manual impl: a derive would require `E::Conn: Debug`, and the resolved
    // path may embed the MotherDuck token, which must not be printed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseClient")
            .field("backend", &self.address.kind)
            .field("policy", &self.policy)
            .field("ephemeral", &self.is_ephemeral())
            .finish_non_exhaustive()
    }
}

impl DatabaseClient<DuckDbEngine> {
    /// Resolve the address and initialize a client over the real engine
    pub fn connect(settings: ClientSettings) -> Result<Self> {
        Self::with_engine(DuckDbEngine, settings)
    }
}

impl<E: Engine> DatabaseClient<E> {
    /// Resolve the address and initialize a client over the given engine
    pub fn with_engine(engine: E, settings: ClientSettings) -> Result<Self> {
        let db_path = settings.db_path.as_deref().unwrap_or(":memory:");
        let address = resolve(db_path, settings.motherduck_token.as_deref(), settings.saas_mode)?;
        info!(backend = %address.kind, "database client initialized in `{}` mode", address.kind);

        // One-time, process-wide side effect: DuckDB reads its home
        // directory from HOME.
        if let Some(home_dir) = &settings.home_dir {
            std::env::set_var("HOME", home_dir);
        }

        let policy = ConnectionPolicy {
            read_only: settings.read_only,
            json_output: settings.json_output,
            saas_mode: settings.saas_mode,
        };

        let mode = initialize(&engine, &address, policy.read_only)?;
        Ok(Self { engine, address, policy, mode })
    }

    /// The backend kind this client resolved to; never changes
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.address.kind
    }

    /// The connection policy supplied at construction
    #[must_use]
    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    /// Whether the client runs in ephemeral-connection mode (no held handle)
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        matches!(self.mode, ConnectionMode::Ephemeral)
    }

    /// Execute a statement and capture the structured result
    ///
    /// In ephemeral mode a fresh read-only connection is opened for this
    /// call and dropped before returning, on every exit path including
    /// failures. In persistent mode the held handle is used and never
    /// closed here. Execution failures surface as
    /// [`DuckgateError::QueryFailed`] carrying the engine message and do
    /// not invalidate the client.
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        match &self.mode {
            ConnectionMode::Persistent(conn) => conn.run(sql),
            ConnectionMode::Ephemeral => {
                let conn = self.engine.connect(&self.address.path, self.policy.read_only)?;
                conn.run(sql)
            }
        }
    }

    /// Execute a statement and format the result per the client's policy
    ///
    /// Returns pretty-printed JSON when `json_output` is set, a text table
    /// otherwise.
    pub fn query(&self, sql: &str) -> Result<String> {
        let result = self.execute(sql)?;
        if self.policy.json_output {
            output::render_json(&result)
        } else {
            Ok(output::render_table(&result))
        }
    }
}

/// Drive the backend-specific initialization protocol
fn initialize<E: Engine>(
    engine: &E,
    address: &ResolvedAddress,
    read_only: bool,
) -> Result<ConnectionMode<E::Conn>> {
    info!(backend = %address.kind, "connecting to {} database", address.kind);

    // Object-store backends are always attached read-only; an explicit
    // read-only connection request is contradictory and fails before any
    // connection attempt.
    if address.kind.is_object_store() && read_only {
        return Err(DuckgateError::config_error(format!(
            "Read-only mode is not supported for {} databases",
            address.kind.as_str().to_uppercase()
        )));
    }

    if address.kind == BackendKind::DuckDb && read_only {
        // Probe once so a bad path or lock fails at startup, then hold no
        // handle: every query gets a fresh read-only view.
        let conn = engine.connect(&address.path, true)?;
        conn.run("SELECT 1").map_err(|e| {
            error!("read-only probe failed: {e}");
            DuckgateError::connection_failed(format!("Read-only check failed: {}", e.message()))
        })?;
        drop(conn);
        return Ok(ConnectionMode::Ephemeral);
    }

    if address.kind.is_object_store() {
        let conn = engine.connect_in_memory()?;
        install_httpfs(&conn)?;
        conn.exec("LOAD httpfs;")
            .map_err(|e| DuckgateError::connection_failed(format!("Failed to load httpfs extension: {}", e.message())))?;

        if let Some(secret_sql) = object_store_secret(address.kind) {
            conn.exec(&secret_sql).map_err(|e| {
                DuckgateError::connection_failed(format!("Failed to register {} secret: {}", address.kind, e.message()))
            })?;
        }

        attach_object_store(&conn, &address.path, address.kind, read_only)?;
        return Ok(ConnectionMode::Persistent(conn));
    }

    // MotherDuck, or a writable local database: one direct connection held
    // for the client's lifetime.
    let conn = engine.connect(&address.path, read_only)?;
    info!(backend = %address.kind, "successfully connected");
    Ok(ConnectionMode::Persistent(conn))
}

/// Install the httpfs extension, absorbing "already installed"
///
/// Any other installation failure is fatal to initialization.
fn install_httpfs<C: EngineConn>(conn: &C) -> Result<()> {
    match conn.exec("INSTALL httpfs;") {
        Ok(()) => Ok(()),
        Err(e) if e.message().contains("already installed") => Ok(()),
        Err(e) => Err(DuckgateError::connection_failed(format!(
            "Failed to install httpfs extension: {}",
            e.message()
        ))),
    }
}

/// Build the CREATE SECRET statement for an object-store backend
///
/// Returns `None` when the environment does not carry a complete credential
/// bundle; the engine may still succeed through its own credential
/// discovery. Credentials are read from the environment at initialization
/// and never persisted beyond the statement.
fn object_store_secret(kind: BackendKind) -> Option<String> {
    match kind {
        BackendKind::S3 => {
            let key_id = std::env::var("AWS_ACCESS_KEY_ID").ok()?;
            let secret = std::env::var("AWS_SECRET_ACCESS_KEY").ok()?;
            let region =
                std::env::var("AWS_DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".to_string());
            Some(format!(
                "CREATE SECRET IF NOT EXISTS s3_secret (TYPE S3, KEY_ID '{}', SECRET '{}', REGION '{}');",
                sql_quote(&key_id),
                sql_quote(&secret),
                sql_quote(&region)
            ))
        }
        BackendKind::R2 => {
            let key_id = std::env::var("R2_ACCESS_KEY_ID").ok()?;
            let secret = std::env::var("R2_SECRET_ACCESS_KEY").ok()?;
            let account_id = std::env::var("R2_ACCOUNT_ID").ok()?;
            Some(format!(
                "CREATE SECRET IF NOT EXISTS r2_secret (TYPE r2, KEY_ID '{}', SECRET '{}', ACCOUNT_ID '{}');",
                sql_quote(&key_id),
                sql_quote(&secret),
                sql_quote(&account_id)
            ))
        }
        BackendKind::DuckDb | BackendKind::MotherDuck => None,
    }
}

/// Attach an object-store database under its backend alias
///
/// The attachment is always read-only; object storage is treated as
/// read-only media regardless of the policy flag. When the database does
/// not exist and the policy allows writes, the attach is retried exactly
/// once without the read-only flag so the engine creates it.
fn attach_object_store<C: EngineConn>(
    conn: &C,
    path: &str,
    kind: BackendKind,
    read_only: bool,
) -> Result<()> {
    let alias = match kind {
        BackendKind::S3 => "s3db",
        BackendKind::R2 => "r2db",
        other => {
            return Err(DuckgateError::config_error(format!(
                "{other} is not an object-store backend"
            )))
        }
    };

    if let Err(e) = conn.exec(&format!("ATTACH '{}' AS {alias} (READ_ONLY);", sql_quote(path))) {
        let message = e.message();
        // Contract with the engine's error text; see the attach-retry note
        // in DESIGN.md.
        if message.contains("does not exist") && !read_only {
            info!("{} database does not exist, attempting to create it", kind.as_str().to_uppercase());
            conn.exec(&format!("ATTACH '{}' AS {alias};", sql_quote(path))).map_err(|e| {
                error!("failed to create {} database: {e}", kind.as_str().to_uppercase());
                DuckgateError::connection_failed(format!(
                    "Failed to create {} database: {}",
                    kind.as_str().to_uppercase(),
                    e.message()
                ))
            })?;
        } else {
            error!("failed to attach {} database: {message}", kind.as_str().to_uppercase());
            return Err(DuckgateError::connection_failed(format!(
                "Failed to attach {} database: {message}",
                kind.as_str().to_uppercase()
            )));
        }
    }

    conn.exec(&format!("USE {alias};")).map_err(|e| {
        DuckgateError::connection_failed(format!("Failed to switch to {alias}: {}", e.message()))
    })?;

    info!("successfully attached {} database as read-only", kind.as_str().to_uppercase());
    Ok(())
}

/// Escape a string for inclusion in a single-quoted SQL literal
fn sql_quote(s: &str) -> String {
    s.replace('\'', "''")
}
