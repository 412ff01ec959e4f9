//! Data types for footprint reports

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One row of catalog metadata for an InnoDB base table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Schema (database) the table belongs to
    pub schema: String,
    /// Table name
    pub name: String,
    /// Estimated row count; approximate for InnoDB
    pub row_count: u64,
    /// Bytes the engine reports for clustered index data
    pub data_length: u64,
    /// Bytes allocated but unused
    pub data_free: u64,
    /// Bytes the engine reports for secondary indexes
    pub index_length: u64,
}

impl TableMeta {
    /// `schema.table`, for logs and error messages
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// A catalog row joined with its measured disk footprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Catalog metadata as read
    #[serde(flatten)]
    pub meta: TableMeta,
    /// `data_length + index_length + data_free`
    pub declared_size: u64,
    /// Bytes of the table's data files on disk
    pub disk_size: u64,
}

impl TableRecord {
    /// Join catalog metadata with a disk measurement.
    ///
    /// The declared size is derived from the catalog only; the disk size is
    /// kept as measured, even when the two disagree.
    pub fn new(meta: TableMeta, disk_size: u64) -> Self {
        let declared_size = meta.data_length + meta.index_length + meta.data_free;
        Self {
            meta,
            declared_size,
            disk_size,
        }
    }

    /// Declared size as a percentage of the disk footprint
    pub fn efficiency(&self) -> Ratio {
        Ratio::percent(self.declared_size, self.disk_size)
    }

    /// Index bytes as a percentage of the declared size
    pub fn overhead(&self) -> Ratio {
        Ratio::percent(self.meta.index_length, self.declared_size)
    }
}

/// Running sums for one schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTotals {
    pub disk_size: u64,
    pub declared_size: u64,
    pub data_length: u64,
    pub index_length: u64,
    pub data_free: u64,
}

impl SchemaTotals {
    /// Add one table to the sums
    pub fn add(&mut self, table: &TableRecord) {
        self.disk_size += table.disk_size;
        self.declared_size += table.declared_size;
        self.data_length += table.meta.data_length;
        self.index_length += table.meta.index_length;
        self.data_free += table.meta.data_free;
    }

    /// Declared size as a percentage of the disk footprint
    pub fn efficiency(&self) -> Ratio {
        Ratio::percent(self.declared_size, self.disk_size)
    }

    /// Index bytes as a percentage of the declared size
    pub fn overhead(&self) -> Ratio {
        Ratio::percent(self.index_length, self.declared_size)
    }
}

/// Aggregated footprint of one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    /// Schema name
    pub name: String,
    /// Sums over all tables below
    pub totals: SchemaTotals,
    /// Tables in catalog order
    pub tables: Vec<TableRecord>,
}

impl SchemaReport {
    /// Start an empty report for a schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            totals: SchemaTotals::default(),
            tables: Vec::new(),
        }
    }

    /// Append a table and fold it into the totals
    pub fn push(&mut self, table: TableRecord) {
        self.totals.add(&table);
        self.tables.push(table);
    }
}

/// Integer percentage, or undefined when the denominator is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ratio {
    /// `100 * numerator / denominator`, truncated
    Percent(u64),
    /// Denominator was zero
    Undefined,
}

impl Ratio {
    /// Compute `100 * numerator / denominator` with truncating division.
    ///
    /// Widens to `u128` so large byte counts cannot overflow the multiply.
    pub fn percent(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Ratio::Undefined;
        }
        let pct = u128::from(numerator) * 100 / u128::from(denominator);
        Ratio::Percent(u64::try_from(pct).unwrap_or(u64::MAX))
    }

    /// The percentage, if defined
    pub fn value(&self) -> Option<u64> {
        match self {
            Ratio::Percent(p) => Some(*p),
            Ratio::Undefined => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Percent(p) => f.pad(&format!("{p}%")),
            Ratio::Undefined => f.pad("n/a"),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}
