// ABOUTME: Rewrites ordered row statements from the POSIX/sqlite dialect to S3/PostgreSQL
// ABOUTME: Renames datastore identifiers, converts hex literals, appends counter resets

use crate::profile::SchemaProfile;

/// Comment emitted ahead of the sequence reset statements in the translated
/// artifact. Kept as a plain SQL comment so the file stays executable as-is.
const RESET_COMMENT: &str =
    "/* Update counters (not autoincremented since inserts contain the ids) */";

/// Rewrite a single row statement into the S3/PostgreSQL dialect.
///
/// Applies, in order: the storage-record table rename, the datastore marker
/// rename, and the hex-literal conversion. All three rewrites are idempotent
/// on their own output: translating an already-translated statement leaves
/// it unchanged.
pub fn translate_statement(statement: &str, profile: &SchemaProfile) -> String {
    let statement = statement.replace(&profile.record_table.from, &profile.record_table.to);
    let statement = statement.replace(
        &profile.datastore_marker.from,
        &profile.datastore_marker.to,
    );
    convert_hex_literals(&statement)
}

/// Convert sqlite hex blob literals (`X'4142'`) into PostgreSQL escaped
/// bytea literals (`'\x4142'`).
///
/// Only well-formed literals are rewritten: the `X` must sit at a
/// non-identifier boundary, and the quoted body must be hex digits closed by
/// a quote. The digit sequence itself is copied through unchanged. Anything
/// else (identifiers ending in X, unterminated quotes, non-hex bodies) is
/// left as it was.
pub fn convert_hex_literals(statement: &str) -> String {
    let mut out = String::with_capacity(statement.len());
    let mut rest = statement;

    while let Some(pos) = rest.find("X'") {
        let (head, tail) = rest.split_at(pos);
        let body = &tail[2..];

        let boundary = head
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_ascii_alphanumeric() && c != '_');
        let digits_end = body
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(body.len());

        out.push_str(head);
        if boundary && body[digits_end..].starts_with('\'') {
            out.push_str("'\\x");
            out.push_str(&body[..digits_end]);
            out.push('\'');
            rest = &body[digits_end + 1..];
        } else {
            out.push_str("X'");
            rest = body;
        }
    }

    out.push_str(rest);
    out
}

/// Build the trailing counter-reset statements for the profile's sequences.
///
/// The replayed inserts carry explicit primary keys, so each sequence is
/// bumped to one past the current maximum to keep later auto-generated ids
/// from colliding with the replayed ones.
pub fn sequence_reset_statements(profile: &SchemaProfile) -> Vec<String> {
    if profile.sequence_resets.is_empty() {
        return Vec::new();
    }
    let mut statements = vec![RESET_COMMENT.to_string()];
    for reset in &profile.sequence_resets {
        statements.push(format!(
            "SELECT setval('{}', MAX({})+1) FROM {};",
            reset.sequence, reset.column, reset.table
        ));
    }
    statements
}

/// Translate an ordered row block into the S3/PostgreSQL variant.
///
/// Copy-then-rewrite: the input block is not touched, the returned block is
/// the rewritten statements followed by the sequence resets.
pub fn translate_rows(rows: &[String], profile: &SchemaProfile) -> Vec<String> {
    rows.iter()
        .map(|row| translate_statement(row, profile))
        .chain(sequence_reset_statements(profile))
        .collect()
}
