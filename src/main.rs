//! Duckgate CLI Entry Point
//!
//! Thin wrapper over the library: resolve the address, initialize the
//! client, run one statement, print the formatted result. Results go to
//! stdout; logs go to stderr.

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use duckgate::{ClientSettings, DatabaseClient};

/// Duckgate - run SQL against DuckDB, MotherDuck, or object-store databases
#[derive(Parser)]
#[command(name = "duckgate")]
#[command(about = "Uniform query runner for DuckDB, MotherDuck, S3 and R2 databases")]
#[command(version)]
struct Cli {
    /// SQL statement to execute
    sql: String,

    /// Database address: a file path, `:memory:`, `md:<db>`, `s3://...` or `r2://...`
    #[arg(long, default_value = ":memory:")]
    db_path: String,

    /// MotherDuck token (falls back to the `motherduck_token` environment variable)
    #[arg(long)]
    motherduck_token: Option<String>,

    /// Home directory override for the engine's config and cache location
    #[arg(long)]
    home_dir: Option<String>,

    /// Connect to MotherDuck in SaaS mode
    #[arg(long)]
    saas_mode: bool,

    /// Open local databases read-only
    #[arg(long)]
    read_only: bool,

    /// Emit results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let client = DatabaseClient::connect(ClientSettings {
        db_path: Some(cli.db_path),
        motherduck_token: cli.motherduck_token,
        home_dir: cli.home_dir,
        saas_mode: cli.saas_mode,
        read_only: cli.read_only,
        json_output: cli.json,
    })?;

    println!("{}", client.query(&cli.sql)?);
    Ok(())
}
