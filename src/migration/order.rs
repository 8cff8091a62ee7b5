// ABOUTME: Reorders row insert statements to respect foreign-key dependencies
// ABOUTME: Stable bucket sort against the schema profile's insert order

use std::collections::HashMap;

/// Row statements sorted into dependency order.
///
/// `unmatched` holds statements whose target table does not appear in the
/// insert order. They are excluded from `statements` (the target schema has
/// no home for them) but returned so callers can report how many rows the
/// reordering left behind instead of losing them silently.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderedRows {
    pub statements: Vec<String>,
    pub unmatched: Vec<String>,
}

/// Extract the target table of an INSERT statement.
///
/// Returns the token following `INTO`, with surrounding double quotes
/// stripped (sqlite3 quotes identifiers in newer dump formats).
pub fn insert_target(statement: &str) -> Option<&str> {
    let rest = &statement[statement.find("INTO ")? + "INTO ".len()..];
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    let table = rest[..end].trim_matches('"');
    if table.is_empty() {
        None
    } else {
        Some(table)
    }
}

/// Reorder row statements so inserts into a table come after inserts into
/// every table it depends on, per `insert_order`.
///
/// The sort is stable: statements targeting the same table keep their
/// relative order from the input. Statements whose target is absent from
/// `insert_order` land in `unmatched`.
pub fn order_by_dependency(rows: &[String], insert_order: &[String]) -> OrderedRows {
    let rank: HashMap<&str, usize> = insert_order
        .iter()
        .enumerate()
        .map(|(i, table)| (table.as_str(), i))
        .collect();

    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); insert_order.len()];
    let mut unmatched = Vec::new();

    for row in rows {
        match insert_target(row).and_then(|table| rank.get(table)) {
            Some(&i) => buckets[i].push(row.clone()),
            None => unmatched.push(row.clone()),
        }
    }

    OrderedRows {
        statements: buckets.into_iter().flatten().collect(),
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(tables: &[&str]) -> Vec<String> {
        tables.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_insert_target() {
        assert_eq!(
            insert_target("INSERT INTO dataset VALUES(1,2);"),
            Some("dataset")
        );
        assert_eq!(
            insert_target("INSERT INTO \"dataset_type\" VALUES(1);"),
            Some("dataset_type")
        );
        assert_eq!(insert_target("INSERT INTO run(id) VALUES(1);"), Some("run"));
        assert_eq!(insert_target("CREATE TABLE foo (id INTEGER);"), None);
    }

    #[test]
    fn test_statements_follow_dependency_order() {
        let rows = vec![
            "INSERT INTO foo VALUES(1,X'FF');".to_string(),
            "INSERT INTO bar VALUES(2,X'00');".to_string(),
        ];

        let ordered = order_by_dependency(&rows, &order(&["bar", "foo"]));

        assert_eq!(
            ordered.statements,
            vec![
                "INSERT INTO bar VALUES(2,X'00');".to_string(),
                "INSERT INTO foo VALUES(1,X'FF');".to_string(),
            ]
        );
        assert!(ordered.unmatched.is_empty());
    }

    #[test]
    fn test_same_table_statements_keep_relative_order() {
        let rows = vec![
            "INSERT INTO run VALUES(3);".to_string(),
            "INSERT INTO dataset VALUES(1);".to_string(),
            "INSERT INTO run VALUES(1);".to_string(),
            "INSERT INTO run VALUES(2);".to_string(),
        ];

        let ordered = order_by_dependency(&rows, &order(&["run", "dataset"]));

        assert_eq!(
            ordered.statements,
            vec![
                "INSERT INTO run VALUES(3);".to_string(),
                "INSERT INTO run VALUES(1);".to_string(),
                "INSERT INTO run VALUES(2);".to_string(),
                "INSERT INTO dataset VALUES(1);".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_table_statements_are_surfaced() {
        let rows = vec![
            "INSERT INTO dataset VALUES(1);".to_string(),
            "INSERT INTO legacy_table VALUES(9);".to_string(),
        ];

        let ordered = order_by_dependency(&rows, &order(&["dataset"]));

        assert_eq!(ordered.statements.len(), 1);
        assert_eq!(
            ordered.unmatched,
            vec!["INSERT INTO legacy_table VALUES(9);".to_string()]
        );
    }

    #[test]
    fn test_prefix_table_names_do_not_collide() {
        // "dataset" must not swallow inserts aimed at "dataset_type"
        let rows = vec![
            "INSERT INTO dataset_type VALUES(1);".to_string(),
            "INSERT INTO dataset VALUES(2);".to_string(),
        ];

        let ordered = order_by_dependency(&rows, &order(&["dataset_type", "dataset"]));

        assert_eq!(
            ordered.statements,
            vec![
                "INSERT INTO dataset_type VALUES(1);".to_string(),
                "INSERT INTO dataset VALUES(2);".to_string(),
            ]
        );
        assert!(ordered.unmatched.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let ordered = order_by_dependency(&[], &order(&["dataset"]));
        assert!(ordered.statements.is_empty());
        assert!(ordered.unmatched.is_empty());
    }
}
