// ABOUTME: Versioned schema profile: table dependency order and dialect rules
// ABOUTME: Ships a built-in gen3 registry default, overridable from a TOML file

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A literal identifier substitution between the two storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// One auto-increment sequence to reset after replaying rows with explicit ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceReset {
    pub sequence: String,
    pub column: String,
    pub table: String,
}

/// Everything about a registry schema version that the pipeline needs to know:
/// the foreign-key insert order, tables kept around from earlier schema
/// versions, the identifier renames between the POSIX and S3 dialects, and
/// the sequences to reset after ingest.
///
/// The built-in default targets the gen3 registry schema. A different schema
/// version is described by a TOML file with the same shape and passed via
/// `--profile`, keeping schema drift out of the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProfile {
    /// Schema version tag, informational only.
    pub version: String,
    /// Insert order: a table's rows may only be inserted after every table
    /// preceding it here.
    pub insert_order: Vec<String>,
    /// Tables from earlier schema versions that a clean must still drop.
    #[serde(default)]
    pub historical_tables: Vec<String>,
    /// Storage-record table rename between dialects.
    pub record_table: Rename,
    /// Datastore class marker rename between dialects.
    pub datastore_marker: Rename,
    /// Sequences reset to MAX(id)+1 at the end of the translated block.
    #[serde(default)]
    pub sequence_resets: Vec<SequenceReset>,
}

impl Default for SchemaProfile {
    fn default() -> Self {
        let insert_order = [
            "dataset_type",
            "dataset_type_dimensions",
            "execution",
            "run",
            "instrument",
            "physical_filter",
            "detector",
            "visit",
            "exposure",
            "skymap",
            "tract",
            "patch",
            "calibration_label",
            "visit_detector_region",
            "visit_detector_skypix_join",
            "patch_skypix_join",
            "posix_datastore_records",
            "dataset",
            "dataset_composition",
            "dataset_collection",
            "dataset_storage",
        ];
        let historical_tables = ["dataset_consumers", "dataset_type_metadata", "quantum"];

        SchemaProfile {
            version: "gen3-w_2019_38".to_string(),
            insert_order: insert_order.iter().map(|t| t.to_string()).collect(),
            historical_tables: historical_tables.iter().map(|t| t.to_string()).collect(),
            record_table: Rename {
                from: "posix_datastore_records".to_string(),
                to: "s3datastorerecords".to_string(),
            },
            datastore_marker: Rename {
                from: "POSIXDatastore".to_string(),
                to: "S3Datastore".to_string(),
            },
            sequence_resets: vec![
                SequenceReset {
                    sequence: "dataset_id_seq".to_string(),
                    column: "dataset_id".to_string(),
                    table: "dataset".to_string(),
                },
                SequenceReset {
                    sequence: "execution_id_seq".to_string(),
                    column: "execution_id".to_string(),
                    table: "execution".to_string(),
                },
            ],
        }
    }
}

impl SchemaProfile {
    /// Load a profile from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema profile {}", path.display()))?;
        let profile: SchemaProfile = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse schema profile {}", path.display()))?;
        if profile.insert_order.is_empty() {
            bail!(
                "Schema profile {} has an empty insert_order",
                path.display()
            );
        }
        Ok(profile)
    }

    /// Load a profile from an optional path, falling back to the built-in
    /// default.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Drop order for cleaning a target: historical tables first, then the
    /// insert order reversed so dependents go before their dependencies. The
    /// target holds the renamed record table, so the rename is applied here.
    pub fn drop_order(&self) -> Vec<String> {
        self.historical_tables
            .iter()
            .cloned()
            .chain(self.insert_order.iter().rev().map(|table| {
                if *table == self.record_table.from {
                    self.record_table.to.clone()
                } else {
                    table.clone()
                }
            }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_drop_order_is_reverse_of_insert_order() {
        let profile = SchemaProfile::default();
        let drops = profile.drop_order();

        // Historical tables lead
        assert_eq!(
            &drops[..profile.historical_tables.len()],
            profile.historical_tables.as_slice()
        );

        // Then the insert order, reversed
        let active = &drops[profile.historical_tables.len()..];
        assert_eq!(active.first().map(String::as_str), Some("dataset_storage"));
        assert_eq!(active.last().map(String::as_str), Some("dataset_type"));
        assert_eq!(active.len(), profile.insert_order.len());
    }

    #[test]
    fn test_drop_order_uses_renamed_record_table() {
        let profile = SchemaProfile::default();
        let drops = profile.drop_order();

        assert!(drops.contains(&"s3datastorerecords".to_string()));
        assert!(!drops.contains(&"posix_datastore_records".to_string()));
    }

    #[test]
    fn test_load_without_path_uses_builtin_default() {
        let profile = SchemaProfile::load(None).unwrap();
        assert_eq!(profile.version, "gen3-w_2019_38");
        assert_eq!(profile.insert_order.len(), 21);
    }

    #[test]
    fn test_from_file_parses_toml_profile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
version = "test-v1"
insert_order = ["bar", "foo"]
historical_tables = ["old"]

[record_table]
from = "bar_records"
to = "bar_records_v2"

[datastore_marker]
from = "LocalStore"
to = "RemoteStore"

[[sequence_resets]]
sequence = "foo_id_seq"
column = "id"
table = "foo"
"#
        )
        .unwrap();

        let profile = SchemaProfile::from_file(file.path()).unwrap();

        assert_eq!(profile.version, "test-v1");
        assert_eq!(profile.insert_order, vec!["bar", "foo"]);
        assert_eq!(profile.sequence_resets.len(), 1);
        assert_eq!(
            profile.drop_order(),
            vec!["old".to_string(), "foo".to_string(), "bar".to_string()]
        );
    }

    #[test]
    fn test_from_file_rejects_empty_insert_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
version = "test-v1"
insert_order = []

[record_table]
from = "a"
to = "b"

[datastore_marker]
from = "c"
to = "d"
"#
        )
        .unwrap();

        assert!(SchemaProfile::from_file(file.path()).is_err());
    }
}
