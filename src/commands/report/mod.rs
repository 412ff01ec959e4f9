//! Footprint report: catalog sizes vs. on-disk table files
//!
//! The run is one-shot and fail-fast: a connection, query or directory
//! failure aborts the whole report. The catalog connection is closed on every
//! path before returning.

mod display;

use anyhow::{Context, Result};
use footprint::catalog::Catalog;
use footprint::catalog::mysql::MysqlCatalog;
use footprint::{FsProber, ProbeProgress, ReportOptions, SchemaReport, build_report};
use log::info;
use std::path::PathBuf;

use crate::Context as AppContext;
use crate::cli::ReportArgs;
use crate::config::ReportSettings;
use crate::progress::ProbeBar;
use crate::ui;

/// Result of collecting a report, before rendering
#[derive(Debug)]
pub struct Collected {
    pub datadir: PathBuf,
    pub table_count: usize,
    pub reports: Vec<SchemaReport>,
}

/// Run the footprint report against a live server
pub fn run(ctx: &AppContext, args: ReportArgs) -> Result<()> {
    let settings = ReportSettings::from_args(&args)?;

    let mut catalog = MysqlCatalog::connect(&settings.connection).with_context(|| {
        format!(
            "Could not connect to {}",
            settings.connection.redacted_url()
        )
    })?;

    let mut bar = ProbeBar::new(!ctx.quiet && !settings.json);
    let collected = collect(&mut catalog, &settings, &mut bar);
    catalog.close();
    let collected = collected?;

    render(ctx, &settings, &collected)
}

/// Read the catalog, probe the data directory and aggregate.
///
/// Generic over the catalog so it can run against a fake one.
pub fn collect<C, G>(catalog: &mut C, settings: &ReportSettings, progress: &mut G) -> Result<Collected>
where
    C: Catalog + ?Sized,
    G: ProbeProgress,
{
    let datadir = match &settings.datadir {
        Some(dir) => dir.clone(),
        None => catalog
            .data_dir()
            .context("Could not determine the server's data directory")?,
    };

    let mut tables = catalog.tables().context("Could not read table metadata")?;
    settings.schemas.retain(&mut tables);
    let table_count = tables.len();

    let prober = FsProber::new(&datadir, settings.rule);
    info!(
        "Probing {} tables under {} ({:?} match)",
        table_count,
        prober.base_dir().display(),
        prober.rule()
    );
    let options = ReportOptions {
        jobs: settings.jobs,
    };
    let reports = build_report(tables, &prober, &options, progress)
        .context("Could not measure table files")?;

    Ok(Collected {
        datadir,
        table_count,
        reports,
    })
}

fn render(ctx: &AppContext, settings: &ReportSettings, collected: &Collected) -> Result<()> {
    if settings.json {
        println!("{}", display::to_json(&collected.reports)?);
        return Ok(());
    }

    if !ctx.quiet {
        ui::header("InnoDB Footprint");
        ui::kv("Data directory", &collected.datadir.display().to_string());
        ui::kv(
            "Scope",
            &format!(
                "{} schemas, {} tables",
                collected.reports.len(),
                collected.table_count
            ),
        );
        println!();
    }

    if collected.reports.is_empty() {
        ui::warn("No InnoDB tables found");
        return Ok(());
    }

    display::print_text(&collected.reports);

    if ctx.verbose > 0 {
        println!();
        ui::dim("szDB: data + index + free as reported by InnoDB");
        ui::dim("szFS: bytes of matching .ibd files on disk");
        ui::dim("eff: szDB / szFS, ovhd: index / szDB");
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaFilter;
    use footprint::catalog::mysql::ConnectParams;
    use footprint::{MatchRule, NoProgress, Ratio, TableMeta};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Catalog serving fixed rows
    struct FakeCatalog {
        tables: Vec<TableMeta>,
        datadir: Option<PathBuf>,
        fail_tables: bool,
    }

    impl Catalog for FakeCatalog {
        fn tables(&mut self) -> footprint::Result<Vec<TableMeta>> {
            if self.fail_tables {
                return Err(footprint::Error::Connectivity {
                    message: "server has gone away".into(),
                });
            }
            Ok(self.tables.clone())
        }

        fn data_dir(&mut self) -> footprint::Result<PathBuf> {
            self.datadir.clone().ok_or_else(|| footprint::Error::ConfigMissing {
                setting: "datadir".into(),
            })
        }
    }

    fn meta(schema: &str, name: &str, rows: u64, data: u64, index: u64) -> TableMeta {
        TableMeta {
            schema: schema.into(),
            name: name.into(),
            row_count: rows,
            data_length: data,
            data_free: 0,
            index_length: index,
        }
    }

    fn settings(schemas: &[&str]) -> ReportSettings {
        let patterns: Vec<String> = schemas.iter().map(|s| s.to_string()).collect();
        ReportSettings {
            connection: ConnectParams {
                host: "127.0.0.1".into(),
                port: 3306,
                user: "report".into(),
                password: None,
            },
            datadir: None,
            schemas: SchemaFilter::new(&patterns).unwrap(),
            jobs: 1,
            rule: MatchRule::Prefix,
            json: false,
        }
    }

    fn write_sized(dir: &Path, name: &str, len: usize) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), vec![0u8; len]).unwrap();
    }

    fn scenario() -> (TempDir, FakeCatalog) {
        let tmp = TempDir::new().unwrap();
        write_sized(&tmp.path().join("appdb"), "users.ibd", 2560);
        write_sized(&tmp.path().join("logsdb"), "events.ibd", 1_048_576);

        let catalog = FakeCatalog {
            tables: vec![
                meta("appdb", "users", 10, 2048, 512),
                meta("logsdb", "events", 1_000_000, 1_048_576, 0),
            ],
            datadir: Some(tmp.path().to_path_buf()),
            fail_tables: false,
        };
        (tmp, catalog)
    }

    #[test]
    fn test_end_to_end_two_schemas() {
        let (_tmp, mut catalog) = scenario();
        let collected = collect(&mut catalog, &settings(&[]), &mut NoProgress).unwrap();

        assert_eq!(collected.table_count, 2);
        let names: Vec<&str> = collected.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["appdb", "logsdb"]);
        assert_eq!(collected.reports[0].totals.efficiency(), Ratio::Percent(100));
        assert_eq!(collected.reports[0].totals.overhead(), Ratio::Percent(20));
        assert_eq!(collected.reports[1].totals.efficiency(), Ratio::Percent(100));
        assert_eq!(collected.reports[1].totals.overhead(), Ratio::Percent(0));

        let lines = display::text_lines(&collected.reports);
        assert!(lines[0].starts_with("======== Database: appdb "));
        assert!(lines[0].ends_with("eff: 100%  ovhd: 20%"));
        assert!(lines[2].starts_with("======== Database: logsdb "));
        assert!(lines[2].ends_with("eff: 100%  ovhd:  0%"));
    }

    #[test]
    fn test_datadir_override_skips_server_lookup() {
        let (tmp, mut catalog) = scenario();
        catalog.datadir = None;

        let mut s = settings(&[]);
        s.datadir = Some(tmp.path().to_path_buf());
        let collected = collect(&mut catalog, &s, &mut NoProgress).unwrap();
        assert_eq!(collected.datadir, tmp.path());
        assert_eq!(collected.reports.len(), 2);
    }

    #[test]
    fn test_missing_datadir_fails() {
        let (_tmp, mut catalog) = scenario();
        catalog.datadir = None;

        let err = collect(&mut catalog, &settings(&[]), &mut NoProgress).unwrap_err();
        assert!(err.to_string().contains("data directory"));
    }

    #[test]
    fn test_catalog_failure_propagates() {
        let (_tmp, mut catalog) = scenario();
        catalog.fail_tables = true;

        let err = collect(&mut catalog, &settings(&[]), &mut NoProgress).unwrap_err();
        let root = err.downcast_ref::<footprint::Error>().unwrap();
        assert!(root.is_connectivity());
    }

    #[test]
    fn test_missing_schema_directory_aborts() {
        let (tmp, mut catalog) = scenario();
        fs::remove_dir_all(tmp.path().join("logsdb")).unwrap();

        let err = collect(&mut catalog, &settings(&[]), &mut NoProgress).unwrap_err();
        let root = err.downcast_ref::<footprint::Error>().unwrap();
        assert!(root.is_filesystem());
    }

    #[test]
    fn test_schema_filter_applied() {
        let (_tmp, mut catalog) = scenario();
        let collected = collect(&mut catalog, &settings(&["^logs"]), &mut NoProgress).unwrap();

        assert_eq!(collected.table_count, 1);
        assert_eq!(collected.reports.len(), 1);
        assert_eq!(collected.reports[0].name, "logsdb");
    }

    #[test]
    fn test_parallel_probing_same_result() {
        let (_tmp, mut catalog) = scenario();
        let sequential = collect(&mut catalog, &settings(&[]), &mut NoProgress).unwrap();

        let mut s = settings(&[]);
        s.jobs = 4;
        let parallel = collect(&mut catalog, &s, &mut NoProgress).unwrap();
        assert_eq!(sequential.reports, parallel.reports);
    }
}
