use anyhow::{Context, Result, bail};
use footprint::catalog::mysql::ConnectParams;
use footprint::{MatchRule, TableMeta};
use regex::Regex;
use std::path::PathBuf;

use crate::cli::ReportArgs;

/// Everything a report run needs, resolved from flags and environment
#[derive(Debug)]
pub struct ReportSettings {
    pub connection: ConnectParams,
    /// Overrides the server's datadir when set
    pub datadir: Option<PathBuf>,
    pub schemas: SchemaFilter,
    pub jobs: usize,
    pub rule: MatchRule,
    pub json: bool,
}

impl ReportSettings {
    /// Validate CLI arguments into settings
    pub fn from_args(args: &ReportArgs) -> Result<Self> {
        let user = match args.user.as_deref() {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => bail!("No MySQL user given: set DBUSER or pass --user"),
        };

        let connection = ConnectParams {
            host: args.host.clone(),
            port: args.port,
            user,
            password: args.password.clone().filter(|p| !p.is_empty()),
        };

        let datadir = args
            .datadir
            .as_deref()
            .map(|d| PathBuf::from(shellexpand::tilde(d).as_ref()));

        Ok(Self {
            connection,
            datadir,
            schemas: SchemaFilter::new(&args.schemas)?,
            jobs: usize::from(args.jobs),
            rule: if args.strict_match {
                MatchRule::Boundary
            } else {
                MatchRule::Prefix
            },
            json: args.json,
        })
    }
}

// ============================================================================
// Schema Filter
// ============================================================================

/// Schema name patterns; a schema is kept if any pattern matches
#[derive(Debug, Default)]
pub struct SchemaFilter {
    patterns: Vec<Regex>,
}

impl SchemaFilter {
    /// Compile the patterns. No patterns means every schema is kept.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("Invalid schema pattern '{}'", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Check whether a schema passes the filter
    pub fn is_match(&self, schema: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(schema))
    }

    /// Drop tables of filtered-out schemas, keeping catalog order
    pub fn retain(&self, tables: &mut Vec<TableMeta>) {
        tables.retain(|t| self.is_match(&t.schema));
    }
}

// ============================================================================
// Tests
// ============================================================================
