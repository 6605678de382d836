//! DuckDB Engine Implementation
//!
//! This module implements the [`Engine`] capability traits over the
//! `duckdb` crate (synchronous driver, bundled library).
//!
//! # Implementation Notes
//! - Every connection is tagged with a fixed `custom_user_agent` string so
//!   the engine (and MotherDuck) can identify this client; the tag has no
//!   behavioral effect
//! - Column types are reported with the identifiers the driver exposes for
//!   the result schema
//! - BLOB values are Base64-encoded for JSON safety; NaN and infinite
//!   floats become JSON null

use duckdb::types::{TimeUnit, ValueRef};
use duckdb::{AccessMode, Config, Connection, Row};

use crate::engine::{Engine, EngineConn, QueryResult};
use crate::error::{DuckgateError, Result};

/// Client identification string passed to the engine on every connection
pub const USER_AGENT: &str = concat!("duckgate/", env!("CARGO_PKG_VERSION"));

/// DuckDB engine factory
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbEngine;

/// A live DuckDB connection
///
/// Closed when dropped.
pub struct DuckDbConn {
    conn: Connection,
}

impl Engine for DuckDbEngine {
    type Conn = DuckDbConn;

    fn connect(&self, path: &str, read_only: bool) -> Result<DuckDbConn> {
        let conn = Connection::open_with_flags(path, build_config(read_only)?)
            .map_err(|e| DuckgateError::connection_failed(format!("Failed to open database at '{path}': {e}")))?;
        Ok(DuckDbConn { conn })
    }

    fn connect_in_memory(&self) -> Result<DuckDbConn> {
        let conn = Connection::open_in_memory_with_flags(build_config(false)?)
            .map_err(|e| DuckgateError::connection_failed(format!("Failed to create in-memory database: {e}")))?;
        Ok(DuckDbConn { conn })
    }
}

impl EngineConn for DuckDbConn {
    fn run(&self, sql: &str) -> Result<QueryResult> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DuckgateError::query_failed(format!("Failed to prepare query: {e}")))?;

        let mut rows = stmt
            .query([])
            .map_err(|e| DuckgateError::query_failed(format!("Failed to execute query: {e}")))?;

        let mut columns: Vec<String> = Vec::new();
        let mut column_types: Vec<String> = Vec::new();
        let mut rows_data = Vec::new();

        while let Some(row) = rows
            .next()
            .map_err(|e| DuckgateError::query_failed(format!("Failed to fetch row: {e}")))?
        {
            if columns.is_empty() {
                let stmt_ref: &duckdb::Statement<'_> = row.as_ref();
                columns = stmt_ref.column_names();
                column_types =
                    (0..stmt_ref.column_count()).map(|i| stmt_ref.column_type(i).to_string()).collect();
            }
            rows_data.push(row_to_json(columns.len(), row)?);
        }
        drop(rows);

        // Zero-row result: the schema is still available on the executed statement
        if columns.is_empty() {
            columns = stmt.column_names();
            column_types = (0..stmt.column_count()).map(|i| stmt.column_type(i).to_string()).collect();
        }

        Ok(QueryResult { columns, column_types, rows: rows_data })
    }

    fn exec(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DuckgateError::query_failed(e.to_string()))
    }
}

/// Build the connection config, always carrying the client user-agent tag
fn build_config(read_only: bool) -> Result<Config> {
    let mut config = Config::default()
        .custom_user_agent(USER_AGENT)
        .map_err(|e| DuckgateError::connection_failed(format!("Failed to set user agent: {e}")))?;

    if read_only {
        config = config
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| DuckgateError::connection_failed(format!("Failed to set read-only mode: {e}")))?;
    }

    Ok(config)
}

/// Convert one result row to JSON-safe values, in column order
fn row_to_json(column_count: usize, row: &Row<'_>) -> Result<Vec<serde_json::Value>> {
    let mut values = Vec::with_capacity(column_count);
    for idx in 0..column_count {
        let value_ref = row
            .get_ref(idx)
            .map_err(|e| DuckgateError::query_failed(format!("Failed to read column {idx}: {e}")))?;
        values.push(value_to_json(value_ref)?);
    }
    Ok(values)
}

/// Convert a DuckDB value to a JSON value
fn value_to_json(value_ref: ValueRef<'_>) -> Result<serde_json::Value> {
    Ok(match value_ref {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(i) => serde_json::Value::Number(i.into()),
        ValueRef::SmallInt(i) => serde_json::Value::Number(i.into()),
        ValueRef::Int(i) => serde_json::Value::Number(i.into()),
        ValueRef::BigInt(i) => serde_json::Value::Number(i.into()),
        ValueRef::UTinyInt(u) => serde_json::Value::Number(u.into()),
        ValueRef::USmallInt(u) => serde_json::Value::Number(u.into()),
        ValueRef::UInt(u) => serde_json::Value::Number(u.into()),
        ValueRef::UBigInt(u) => serde_json::Value::Number(u.into()),
        // i128 does not fit in a JSON number; render as text
        ValueRef::HugeInt(i) => serde_json::Value::String(i.to_string()),
        ValueRef::Float(f) => serde_json::Number::from_f64(f64::from(f))
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number), // NaN/Infinity as null
        ValueRef::Decimal(d) => serde_json::Value::String(d.to_string()),
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                DuckgateError::query_failed(format!("Invalid UTF-8 in text value: {e}"))
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(b) => {
            // Encode BLOB as Base64 for JSON safety
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(b);
            serde_json::Value::String(encoded)
        }
        ValueRef::Date32(days) => serde_json::Value::String(format_date(days)),
        ValueRef::Time64(unit, v) => serde_json::Value::String(format_time(unit, v)),
        ValueRef::Timestamp(unit, v) => serde_json::Value::String(format_timestamp(unit, v)),
        // Nested and other exotic engine types are rendered as debug text
        other => serde_json::Value::String(format!("{other:?}")),
    })
}

/// Days from the Common Era to the Unix epoch (1970-01-01)
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a value in the given unit to nanoseconds
fn unit_to_nanos(unit: TimeUnit, v: i64) -> i64 {
    match unit {
        TimeUnit::Second => v.saturating_mul(1_000_000_000),
        TimeUnit::Millisecond => v.saturating_mul(1_000_000),
        TimeUnit::Microsecond => v.saturating_mul(1_000),
        TimeUnit::Nanosecond => v,
    }
}

/// Render a DATE value (days since the Unix epoch) as `YYYY-MM-DD`
fn format_date(days: i32) -> String {
    chrono::NaiveDate::from_num_days_from_ce_opt(EPOCH_DAYS_FROM_CE + days)
        .map_or_else(|| format!("Date32({days})"), |d| d.to_string())
}

/// Render a TIME value (offset since midnight) as `HH:MM:SS[.ffffff]`
fn format_time(unit: TimeUnit, v: i64) -> String {
    let nanos = unit_to_nanos(unit, v);
    let secs = u32::try_from(nanos.div_euclid(1_000_000_000)).unwrap_or(u32::MAX);
    let frac = u32::try_from(nanos.rem_euclid(1_000_000_000)).unwrap_or(0);
    chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, frac)
        .map_or_else(|| format!("Time64({unit:?}, {v})"), |t| t.to_string())
}

/// Render a TIMESTAMP value (offset since the Unix epoch) as
/// `YYYY-MM-DD HH:MM:SS[.ffffff]`, in UTC as the engine reports it
fn format_timestamp(unit: TimeUnit, v: i64) -> String {
    let nanos = unit_to_nanos(unit, v);
    let secs = nanos.div_euclid(1_000_000_000);
    let frac = nanos.rem_euclid(1_000_000_000) as u32;
    chrono::DateTime::from_timestamp(secs, frac)
        .map_or_else(|| format!("Timestamp({unit:?}, {v})"), |dt| dt.naive_utc().to_string())
}
