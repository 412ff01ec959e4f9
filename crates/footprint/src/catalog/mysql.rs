//! MySQL catalog backend
//!
//! Talks to `information_schema` over a single connection. The driver is
//! async; a current-thread runtime owned by the catalog drives it so callers
//! stay synchronous.

use log::{debug, info};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

use super::{Catalog, DATADIR_QUERY, DATADIR_VARIABLE, TABLES_QUERY};
use crate::error::{Error, Result};
use crate::types::TableMeta;

/// Queries slower than this are logged as warnings by the driver
const SLOW_QUERY_THRESHOLD: Duration = Duration::from_secs(10);

/// Where and as whom to connect
#[derive(Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ConnectParams {
    /// `mysql://user@host:port/information_schema`, never including the password
    pub fn redacted_url(&self) -> String {
        format!(
            "mysql://{}{}@{}:{}/information_schema",
            self.user,
            if self.password.is_some() { ":***" } else { "" },
            self.host,
            self.port
        )
    }

    fn options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database("information_schema")
            .log_slow_statements(log::LevelFilter::Warn, SLOW_QUERY_THRESHOLD);
        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

/// Catalog backed by a live MySQL server
pub struct MysqlCatalog {
    runtime: Runtime,
    conn: MySqlConnection,
}

impl MysqlCatalog {
    /// Open and verify a connection to the server
    pub fn connect(params: &ConnectParams) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Connectivity {
                message: format!("cannot start runtime: {e}"),
            })?;

        debug!("Connecting to MySQL {}", params.redacted_url());
        let mut conn = runtime
            .block_on(params.options().connect())
            .map_err(|e| classify(e, None))?;
        runtime
            .block_on(conn.ping())
            .map_err(|e| classify(e, None))?;
        info!("Connected to MySQL {}", params.redacted_url());

        Ok(Self { runtime, conn })
    }

    /// Close the connection, logging rather than failing on errors
    pub fn close(self) {
        let Self { runtime, conn } = self;
        match runtime.block_on(conn.close()) {
            Ok(()) => debug!("Closed MySQL connection"),
            Err(e) => debug!("Error closing MySQL connection: {}", e),
        }
    }
}

impl Catalog for MysqlCatalog {
    fn tables(&mut self) -> Result<Vec<TableMeta>> {
        debug!("Fetching table metadata");
        let rows: Vec<MySqlRow> = self
            .runtime
            .block_on(sqlx::query(TABLES_QUERY).fetch_all(&mut self.conn))
            .map_err(|e| classify(e, None))?;

        let tables = rows.iter().map(decode_table).collect::<Result<Vec<_>>>()?;
        info!("Catalog lists {} InnoDB tables", tables.len());
        Ok(tables)
    }

    fn data_dir(&mut self) -> Result<PathBuf> {
        let rows: Vec<MySqlRow> = self
            .runtime
            .block_on(sqlx::raw_sql(DATADIR_QUERY).fetch_all(&mut self.conn))
            .map_err(|e| classify(e, None))?;

        let value = rows
            .first()
            .map(|row| text(row, 1))
            .transpose()
            .map_err(|e| classify(e, None))?;
        let datadir = datadir_from(value)?;
        debug!("Server datadir: {}", datadir.display());
        Ok(datadir)
    }
}

/// Turn the `datadir` variable's value into a path; absent or empty is missing
fn datadir_from(value: Option<String>) -> Result<PathBuf> {
    match value {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Err(Error::ConfigMissing {
            setting: DATADIR_VARIABLE.to_string(),
        }),
    }
}

/// Decode one row of [`TABLES_QUERY`]
fn decode_table(row: &MySqlRow) -> Result<TableMeta> {
    let schema = text(row, 0).map_err(|e| classify(e, None))?;
    let name = text(row, 1).map_err(|e| classify(e, None))?;
    let qualified = format!("{schema}.{name}");
    let number = |idx: usize| -> Result<u64> {
        row.try_get::<u64, _>(idx)
            .map_err(|e| classify(e, Some(qualified.as_str())))
    };

    Ok(TableMeta {
        row_count: number(2)?,
        data_length: number(3)?,
        data_free: number(4)?,
        index_length: number(5)?,
        schema,
        name,
    })
}

/// Read a text column, accepting binary-collated columns holding UTF-8
fn text(row: &MySqlRow, idx: usize) -> std::result::Result<String, sqlx::Error> {
    match row.try_get::<String, _>(idx) {
        Ok(s) => Ok(s),
        Err(sqlx::Error::ColumnDecode { .. }) => utf8(row.try_get(idx)?),
        Err(e) => Err(e),
    }
}

/// Names that are not valid UTF-8 could never match a file name, so reject them
fn utf8(bytes: Vec<u8>) -> std::result::Result<String, sqlx::Error> {
    String::from_utf8(bytes).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Map a driver error onto the catalog taxonomy.
///
/// Row and column shape problems are `Scan` errors; everything else means the
/// server could not be talked to.
fn classify(e: sqlx::Error, table: Option<&str>) -> Error {
    match e {
        sqlx::Error::RowNotFound
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => Error::Scan {
            table: table.map(String::from),
            message: e.to_string(),
        },
        other => Error::Connectivity {
            message: other.to_string(),
        },
    }
}
