use std::path::PathBuf;

use crate::error::Result;
use crate::types::TableMeta;

#[cfg(feature = "mysql")]
pub mod mysql;

/// InnoDB base tables with known row counts, system schemas excluded.
///
/// Sorted by schema then table name. Numeric columns are cast so they decode
/// as unsigned 64-bit integers on every server version.
pub const TABLES_QUERY: &str = "\
SELECT TABLE_SCHEMA, TABLE_NAME, \
CAST(TABLE_ROWS AS UNSIGNED), CAST(DATA_LENGTH AS UNSIGNED), \
CAST(DATA_FREE AS UNSIGNED), CAST(INDEX_LENGTH AS UNSIGNED) \
FROM information_schema.TABLES \
WHERE ENGINE LIKE 'InnoDB' \
AND TABLE_TYPE LIKE 'BASE TABLE' \
AND TABLE_ROWS IS NOT NULL \
AND TABLE_SCHEMA NOT RLIKE '_schema$' \
AND TABLE_SCHEMA NOT RLIKE '^mysql$' \
ORDER BY TABLE_SCHEMA, TABLE_NAME";

/// Server variable holding the data directory
pub const DATADIR_VARIABLE: &str = "datadir";

/// Lookup of the server's data directory
pub const DATADIR_QUERY: &str = "SHOW GLOBAL VARIABLES LIKE 'datadir'";

/// Source of table metadata.
///
/// Abstracts the database so reports can be built against a fake catalog.
pub trait Catalog {
    /// Size metadata for every InnoDB base table, sorted by schema and name
    fn tables(&mut self) -> Result<Vec<TableMeta>>;

    /// Directory holding the per-schema table files
    fn data_dir(&mut self) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// In-memory catalog
    struct FakeCatalog {
        tables: Vec<TableMeta>,
        data_dir: Option<PathBuf>,
    }

    impl Catalog for FakeCatalog {
        fn tables(&mut self) -> Result<Vec<TableMeta>> {
            Ok(self.tables.clone())
        }

        fn data_dir(&mut self) -> Result<PathBuf> {
            self.data_dir.clone().ok_or_else(|| Error::ConfigMissing {
                setting: DATADIR_VARIABLE.to_string(),
            })
        }
    }

    fn meta(schema: &str, name: &str) -> TableMeta {
        TableMeta {
            schema: schema.into(),
            name: name.into(),
            row_count: 0,
            data_length: 0,
            data_free: 0,
            index_length: 0,
        }
    }

    #[test]
    fn test_tables_query_filters() {
        assert!(TABLES_QUERY.contains("ENGINE LIKE 'InnoDB'"));
        assert!(TABLES_QUERY.contains("TABLE_TYPE LIKE 'BASE TABLE'"));
        assert!(TABLES_QUERY.contains("TABLE_ROWS IS NOT NULL"));
        assert!(TABLES_QUERY.contains("NOT RLIKE '_schema$'"));
        assert!(TABLES_QUERY.contains("NOT RLIKE '^mysql$'"));
        assert!(TABLES_QUERY.ends_with("ORDER BY TABLE_SCHEMA, TABLE_NAME"));
    }

    #[test]
    fn test_missing_datadir() {
        let mut catalog = FakeCatalog {
            tables: vec![meta("a", "t1")],
            data_dir: None,
        };
        assert_eq!(catalog.tables().unwrap().len(), 1);
        match catalog.data_dir() {
            Err(Error::ConfigMissing { setting }) => assert_eq!(setting, "datadir"),
            other => panic!("Expected ConfigMissing, got: {:?}", other),
        }
    }
}
