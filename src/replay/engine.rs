// ABOUTME: Executes definition and row statement batches against the target
// ABOUTME: Best-effort per block: failures are captured and replay continues

use std::fmt;
use tokio_postgres::Client;

/// Which statement block a replay outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Definitions,
    Rows,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Definitions => write!(f, "table definitions"),
            BlockKind::Rows => write!(f, "row inserts"),
        }
    }
}

/// Outcome of replaying one statement block.
///
/// A failed block records the driver's error text; it does not abort the
/// run. Large generated batches routinely contain a few statements that are
/// invalid or already applied, and aborting on the first failure would throw
/// away the valid remainder of the run.
#[derive(Debug, Clone)]
pub struct BlockOutcome {
    pub kind: BlockKind,
    pub error: Option<String>,
}

impl BlockOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Execute one statement block as a single batch.
///
/// The whole block goes through the simple-query protocol in one round trip,
/// so the backend applies it as one implicit transaction: a bad statement
/// fails the batch as a unit, not statement-by-statement.
pub async fn replay_block(client: &Client, kind: BlockKind, sql: &str) -> BlockOutcome {
    tracing::info!("Executing {} batch ({} bytes)...", kind, sql.len());

    match client.batch_execute(sql).await {
        Ok(()) => {
            tracing::info!("✓ {} batch applied", kind);
            BlockOutcome { kind, error: None }
        }
        Err(e) => {
            tracing::warn!("⚠ {} batch failed: {}", kind, e);
            BlockOutcome {
                kind,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Replay the provided blocks in order: definitions first, then rows.
///
/// Either block may be omitted (tables-only or rows-only ingest). Every
/// requested block is attempted regardless of earlier failures, and the
/// per-block outcomes are returned for the caller to inspect or report.
pub async fn replay(
    client: &Client,
    definitions: Option<&str>,
    rows: Option<&str>,
) -> Vec<BlockOutcome> {
    let mut outcomes = Vec::new();

    if let Some(sql) = definitions {
        outcomes.push(replay_block(client, BlockKind::Definitions, sql).await);
    }
    if let Some(sql) = rows {
        outcomes.push(replay_block(client, BlockKind::Rows, sql).await);
    }

    outcomes
}
