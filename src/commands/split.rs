// ABOUTME: Split command: turns a sqlite3 dump into replayable statement files
// ABOUTME: Classifies, orders by dependency, and writes the translated variant

use crate::migration;
use crate::profile::SchemaProfile;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Split a sqlite3 `.dump` file into three artifacts:
///
/// 1. `tables_path` — every non-INSERT line (table definitions), as dumped.
/// 2. `rows_path` — INSERT statements reordered to respect foreign-key
///    dependencies, still in the POSIX/sqlite dialect.
/// 3. `s3_rows_path` — the ordered inserts translated to the
///    S3/PostgreSQL dialect, with sequence resets appended. Defaults to
///    `<rows_path>_s3`.
///
/// The dump itself is never modified; each artifact is staged to a temp file
/// and atomically moved into place.
pub fn split(
    src: &str,
    tables_path: &str,
    rows_path: &str,
    s3_rows_path: Option<&str>,
    profile: &SchemaProfile,
) -> Result<()> {
    tracing::info!("Splitting dump {} (schema profile {})...", src, profile.version);
    let dump =
        fs::read_to_string(src).with_context(|| format!("Failed to read dump file {}", src))?;

    let split = migration::classify(&dump);
    tracing::info!(
        "Classified {} definition line(s) and {} insert statement(s)",
        split.definitions.len(),
        split.rows.len()
    );

    write_artifact(tables_path, &split.definitions)?;
    tracing::info!("✓ Table definitions written to {}", tables_path);

    let ordered = migration::order_by_dependency(&split.rows, &profile.insert_order);
    if !ordered.unmatched.is_empty() {
        tracing::warn!(
            "⚠ {} insert statement(s) reference tables outside the dependency order and were excluded",
            ordered.unmatched.len()
        );
        for statement in &ordered.unmatched {
            tracing::debug!("Excluded: {}", statement);
        }
    }
    write_artifact(rows_path, &ordered.statements)?;
    tracing::info!(
        "✓ {} ordered row insert(s) written to {}",
        ordered.statements.len(),
        rows_path
    );

    let default_s3_path = format!("{}_s3", rows_path);
    let s3_path = s3_rows_path.unwrap_or(&default_s3_path);
    let translated = migration::translate_rows(&ordered.statements, profile);
    write_artifact(s3_path, &translated)?;
    tracing::info!("✓ Translated row insert(s) written to {}", s3_path);

    tracing::info!("✅ Dump split complete");
    Ok(())
}

/// Write statement lines to `path`, staging through a temp file in the same
/// directory so the final artifact appears atomically.
fn write_artifact(path: &str, lines: &[String]) -> Result<()> {
    let parent = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to stage output file for {}", path))?;
    for line in lines {
        writeln!(staged, "{}", line)
            .with_context(|| format!("Failed to write output file {}", path))?;
    }
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to persist output file {}", path))?;
    Ok(())
}
