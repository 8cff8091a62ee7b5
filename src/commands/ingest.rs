// ABOUTME: Ingest command: replays split statement files against the target
// ABOUTME: Also hosts the clean command that drops the registry tables

use crate::profile::SchemaProfile;
use crate::replay::{self, BlockOutcome};
use crate::{postgres, utils};
use anyhow::{bail, Context, Result};
use dialoguer::Confirm;
use std::fs;

/// Replay previously split statement files against the target database.
///
/// `create_tables` and `create_rows` independently select which blocks run,
/// allowing tables-only, rows-only, or both. Each selected block is executed
/// as a single batch; a failed batch is recorded and replay continues, so a
/// partial failure never aborts the run. The per-block outcomes are returned
/// for the caller to report or inspect.
///
/// Only connection establishment is fatal here: without a connection nothing
/// else can proceed.
pub async fn ingest(
    constr: &str,
    tables_path: &str,
    rows_path: &str,
    create_tables: bool,
    create_rows: bool,
) -> Result<Vec<BlockOutcome>> {
    let conninfo = utils::resolve_connection_descriptor(constr)?;
    utils::validate_connection_string(&conninfo)?;

    if !create_tables && !create_rows {
        tracing::warn!("⚠ Nothing to do: both table and row replay are disabled");
        return Ok(Vec::new());
    }

    let definitions = if create_tables {
        Some(fs::read_to_string(tables_path).with_context(|| {
            format!("Failed to read table definitions file {}", tables_path)
        })?)
    } else {
        None
    };
    let rows = if create_rows {
        Some(
            fs::read_to_string(rows_path)
                .with_context(|| format!("Failed to read row inserts file {}", rows_path))?,
        )
    } else {
        None
    };

    tracing::info!("Connecting to target database...");
    let client = postgres::connect_with_retry(&conninfo).await?;
    tracing::info!("✓ Connected to target");

    let outcomes = replay::replay(&client, definitions.as_deref(), rows.as_deref()).await;

    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    if failed > 0 {
        tracing::warn!(
            "⚠ Ingest finished with {}/{} failed batch(es); inspect the log and re-run if needed",
            failed,
            outcomes.len()
        );
    } else {
        tracing::info!("✅ Ingest complete");
    }

    Ok(outcomes)
}

/// Drop all registry tables on the target instead of ingesting.
///
/// Prompts for confirmation unless `assume_yes` is set; the drop itself is
/// absence-tolerant and idempotent.
pub async fn clean(constr: &str, assume_yes: bool, profile: &SchemaProfile) -> Result<()> {
    let conninfo = utils::resolve_connection_descriptor(constr)?;
    utils::validate_connection_string(&conninfo)?;

    if !assume_yes {
        let proceed = Confirm::new()
            .with_prompt("Drop all registry tables on the target?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !proceed {
            bail!("Clean cancelled by user");
        }
    }

    tracing::info!("Connecting to target database...");
    let client = postgres::connect_with_retry(&conninfo).await?;
    tracing::info!("✓ Connected to target");

    let summary = replay::drop_all_tables(&client, profile).await;
    tracing::info!(
        "✅ Clean complete: {} table(s) dropped, {} absent",
        summary.dropped.len(),
        summary.missing.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ingest_with_invalid_descriptor_fails() {
        let result = ingest("not-a-url", "tables", "rows", false, true).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ingest_with_nothing_enabled_is_a_noop() {
        // No file reads, no connection attempt
        let outcomes = ingest(
            "postgresql://u:p@localhost:5432/db",
            "/nonexistent/tables",
            "/nonexistent/rows",
            false,
            false,
        )
        .await
        .unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_with_missing_rows_file_fails_before_connecting() {
        let result = ingest(
            "postgresql://u:p@localhost:5432/db",
            "/nonexistent/tables",
            "/nonexistent/rows",
            false,
            true,
        )
        .await;
        assert!(result.is_err());
    }
}
