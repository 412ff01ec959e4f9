//! # footprint
//!
//! Compare what InnoDB says a table occupies with what its files occupy on disk.
//!
//! This crate provides functionality to:
//! - Read per-table size metadata from `information_schema` ([`catalog`])
//! - Measure the `.ibd` files of a table in the server's data directory ([`probe`])
//! - Aggregate both per schema and derive efficiency and index overhead ([`aggregate`])
//!
//! The catalog and the prober are traits, so reports can be built against
//! fakes without a server or a data directory.
//!
//! ## Example
//!
//! ```no_run
//! use footprint::catalog::Catalog;
//! use footprint::catalog::mysql::{ConnectParams, MysqlCatalog};
//! use footprint::{build_report, FsProber, MatchRule, NoProgress, ReportOptions};
//!
//! let params = ConnectParams {
//!     host: "127.0.0.1".into(),
//!     port: 3306,
//!     user: "report".into(),
//!     password: None,
//! };
//! let mut catalog = MysqlCatalog::connect(&params)?;
//! let prober = FsProber::new(catalog.data_dir()?, MatchRule::Prefix);
//! let tables = catalog.tables()?;
//! catalog.close();
//!
//! for schema in build_report(tables, &prober, &ReportOptions::default(), &mut NoProgress)? {
//!     println!("{}: eff {} ovhd {}", schema.name, schema.totals.efficiency(), schema.totals.overhead());
//! }
//! # Ok::<(), footprint::Error>(())
//! ```

pub mod aggregate;
pub mod catalog;
mod error;
pub mod format;
pub mod probe;
mod types;

pub use aggregate::{build_report, group_by_schema, NoProgress, ProbeProgress, ReportOptions};
pub use error::{Error, Result};
pub use format::human_size;
pub use probe::{FsProber, MatchRule, Prober};
pub use types::{Ratio, SchemaReport, SchemaTotals, TableMeta, TableRecord};
