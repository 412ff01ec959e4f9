//! Join catalog rows with disk measurements and aggregate per schema

use log::{debug, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::probe::Prober;
use crate::types::{SchemaReport, TableMeta, TableRecord};

/// Options controlling how a report is built
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Number of tables probed concurrently (1 = sequential)
    pub jobs: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Callback trait for probe progress updates
pub trait ProbeProgress {
    /// Called once with the number of tables to probe
    fn on_start(&mut self, total: usize);

    /// Called after a table has been measured
    fn on_table(&mut self, table: &TableMeta, disk_size: u64);

    /// Called when all tables are measured
    fn on_complete(&mut self);
}

/// A no-op progress callback for when progress isn't needed
pub struct NoProgress;

impl ProbeProgress for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_table(&mut self, _table: &TableMeta, _disk_size: u64) {}
    fn on_complete(&mut self) {}
}

/// Measure every table and aggregate the results per schema.
///
/// Schemas come back sorted by name. Tables within a schema keep the order
/// they had in `tables`. Input does not need to be grouped by schema.
///
/// The first probe failure (in input order) aborts the whole report.
pub fn build_report<P, G>(
    tables: Vec<TableMeta>,
    prober: &P,
    options: &ReportOptions,
    progress: &mut G,
) -> Result<Vec<SchemaReport>>
where
    P: Prober + ?Sized,
    G: ProbeProgress,
{
    progress.on_start(tables.len());

    let records = if options.jobs <= 1 || tables.len() <= 1 {
        probe_sequential(tables, prober, progress)?
    } else {
        probe_parallel(tables, prober, options.jobs, progress)?
    };

    progress.on_complete();

    let reports = group_by_schema(records);
    debug!("Aggregated {} schemas", reports.len());
    Ok(reports)
}

/// Group measured tables into per-schema reports, keyed by schema name.
pub fn group_by_schema(records: impl IntoIterator<Item = TableRecord>) -> Vec<SchemaReport> {
    let mut schemas: BTreeMap<String, SchemaReport> = BTreeMap::new();

    for record in records {
        schemas
            .entry(record.meta.schema.clone())
            .or_insert_with_key(|name| SchemaReport::new(name.clone()))
            .push(record);
    }

    schemas.into_values().collect()
}

fn probe_sequential<P, G>(
    tables: Vec<TableMeta>,
    prober: &P,
    progress: &mut G,
) -> Result<Vec<TableRecord>>
where
    P: Prober + ?Sized,
    G: ProbeProgress,
{
    let mut records = Vec::with_capacity(tables.len());
    for meta in tables {
        let disk_size = prober.measure(&meta.schema, &meta.name)?;
        note_measurement(&meta, disk_size);
        progress.on_table(&meta, disk_size);
        records.push(TableRecord::new(meta, disk_size));
    }
    Ok(records)
}

fn probe_parallel<P, G>(
    tables: Vec<TableMeta>,
    prober: &P,
    jobs: usize,
    progress: &mut G,
) -> Result<Vec<TableRecord>>
where
    P: Prober + ?Sized,
    G: ProbeProgress,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| Error::ThreadPool {
            message: e.to_string(),
        })?;

    debug!("Probing {} tables with {} workers", tables.len(), jobs);

    // Indexed collect keeps input order
    let sizes: Vec<Result<u64>> = pool.install(|| {
        tables
            .par_iter()
            .map(|meta| prober.measure(&meta.schema, &meta.name))
            .collect()
    });

    let mut records = Vec::with_capacity(tables.len());
    for (meta, size) in tables.into_iter().zip(sizes) {
        let disk_size = size?;
        note_measurement(&meta, disk_size);
        progress.on_table(&meta, disk_size);
        records.push(TableRecord::new(meta, disk_size));
    }
    Ok(records)
}

fn note_measurement(meta: &TableMeta, disk_size: u64) {
    if disk_size == 0 {
        warn!("No data files found for {}", meta.qualified_name());
    } else {
        debug!("{}: {} bytes on disk", meta.qualified_name(), disk_size);
    }
}
