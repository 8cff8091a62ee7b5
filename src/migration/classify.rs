// ABOUTME: Splits a raw sqlite3 dump into definition and row insert statements
// ABOUTME: Line-based partition; any line containing INSERT is a row statement

/// Result of partitioning a dump into its two statement groups.
///
/// `definitions` holds schema statements (CREATE TABLE, indexes, pragmas),
/// `rows` holds INSERT statements. Together they cover every line of the
/// input dump exactly once.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SplitDump {
    pub definitions: Vec<String>,
    pub rows: Vec<String>,
}

/// Partition a sqlite3 `.dump` text into definition and row statements.
///
/// The dump format emits one INSERT per line, while CREATE TABLE statements
/// may span several lines; classification is therefore line-based. A line
/// belongs to the row group if it contains the literal token `INSERT`
/// anywhere (sqlite3 never emits schema statements containing that token).
/// A dump without INSERT statements yields an empty row group, not an error.
pub fn classify(dump: &str) -> SplitDump {
    let mut split = SplitDump::default();
    for line in dump.lines() {
        if line.contains("INSERT") {
            split.rows.push(line.to_string());
        } else {
            split.definitions.push(line.to_string());
        }
    }
    split
}
