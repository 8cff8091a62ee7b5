// ABOUTME: Drops the registry tables on the target in reverse dependency order
// ABOUTME: Absence-tolerant and idempotent; safe against partially ingested targets

use crate::profile::SchemaProfile;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_postgres::Client;

/// What a clean pass did: tables actually dropped and tables skipped.
///
/// Skips are expected, not errors. A prior partial ingest legitimately
/// leaves some tables absent, so per-table failures are swallowed and only
/// counted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub dropped: Vec<String>,
    pub missing: Vec<String>,
}

/// Drop every registry table on the target, dependents before dependencies.
///
/// Each drop cascades to dependent objects. Failures (most commonly: the
/// table does not exist) are logged at debug level and skipped; no drop is
/// retried. Running the clean twice in a row is a no-op the second time.
pub async fn drop_all_tables(client: &Client, profile: &SchemaProfile) -> CleanSummary {
    let drop_order = profile.drop_order();
    let mut summary = CleanSummary::default();

    let progress = ProgressBar::new(drop_order.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    for table in drop_order {
        match client
            .batch_execute(&format!("DROP TABLE {} CASCADE;", table))
            .await
        {
            Ok(()) => {
                progress.set_message(format!("Dropped {}", table));
                summary.dropped.push(table);
            }
            Err(e) => {
                // Tables from a partial or older ingest may simply not exist
                tracing::debug!("Skipping '{}': {}", table, e);
                summary.missing.push(table);
            }
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!(
        "{} dropped, {} absent",
        summary.dropped.len(),
        summary.missing.len()
    ));

    summary
}
