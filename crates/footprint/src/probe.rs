//! Disk footprint measurement for InnoDB table files

use log::{debug, trace};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension of InnoDB file-per-table tablespaces
pub const DATA_FILE_EXTENSION: &str = ".ibd";

/// Measures the bytes a table occupies on disk.
///
/// Implemented for plain functions and closures so callers can substitute
/// a fake filesystem in tests.
pub trait Prober: Send + Sync {
    /// Total size in bytes of all data files belonging to `schema.table`
    fn measure(&self, schema: &str, table: &str) -> Result<u64>;
}

impl<F> Prober for F
where
    F: Fn(&str, &str) -> Result<u64> + Send + Sync,
{
    fn measure(&self, schema: &str, table: &str) -> Result<u64> {
        self(schema, table)
    }
}

/// Which file names count as belonging to a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchRule {
    /// `<table>*.ibd`: any file starting with the table name.
    ///
    /// Also matches other tables sharing the prefix (`orders` picks up
    /// `ordersarchive.ibd`).
    #[default]
    Prefix,
    /// `<table>.ibd` or `<table>#*.ibd`: the name must be followed by the
    /// extension or a partition separator.
    Boundary,
}

impl MatchRule {
    /// Check whether `file_name` is a data file of `table`.
    ///
    /// The table name is compared literally, never as a pattern.
    pub fn matches(&self, table: &str, file_name: &str) -> bool {
        let Some(rest) = file_name.strip_prefix(table) else {
            return false;
        };
        if !rest.ends_with(DATA_FILE_EXTENSION) {
            return false;
        }
        match self {
            MatchRule::Prefix => true,
            MatchRule::Boundary => rest == DATA_FILE_EXTENSION || rest.starts_with('#'),
        }
    }
}

/// Prober reading file sizes from a MySQL data directory
#[derive(Debug, Clone)]
pub struct FsProber {
    base_dir: PathBuf,
    rule: MatchRule,
}

impl FsProber {
    /// Probe files below `base_dir/<schema>/` with the given match rule
    pub fn new(base_dir: impl Into<PathBuf>, rule: MatchRule) -> Self {
        Self {
            base_dir: base_dir.into(),
            rule,
        }
    }

    /// The data directory being probed
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The active match rule
    pub fn rule(&self) -> MatchRule {
        self.rule
    }
}

impl Prober for FsProber {
    fn measure(&self, schema: &str, table: &str) -> Result<u64> {
        let dir = self.base_dir.join(schema);
        let unreadable = |source| Error::DirectoryUnreadable {
            path: dir.clone(),
            source,
        };

        let mut size = 0u64;
        for entry in fs::read_dir(&dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !self.rule.matches(table, name) {
                continue;
            }

            // The file may vanish between listing and stat while the server runs
            match entry.metadata() {
                Ok(meta) if meta.is_file() => {
                    trace!("{}/{}: {} bytes", schema, name, meta.len());
                    size += meta.len();
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping {}/{}: {}", schema, name, e),
            }
        }

        Ok(size)
    }
}
