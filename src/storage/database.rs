use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use crate::config::DatabaseConfig;
use crate::error::{ReportError, Result};
use crate::storage::models::Incident;

/// Incident lookup for PostgreSQL. Casts keep `INTEGER` ids and `TIMESTAMPTZ`
/// columns decodable into the same model.
pub const POSTGRES_INCIDENT_QUERY: &str = "SELECT incident_id::BIGINT AS incident_id, incident_type, severity, description,
        detected_time::TIMESTAMP AS detected_time, resolved_time::TIMESTAMP AS resolved_time,
        status, assigned_to
 FROM security_incidents
 WHERE incident_id = $1
 LIMIT 2";

/// Incident lookup for SQLite.
pub const SQLITE_INCIDENT_QUERY: &str = "SELECT incident_id, incident_type, severity, description,
        detected_time, resolved_time, status, assigned_to
 FROM security_incidents
 WHERE incident_id = $1
 LIMIT 2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Postgres => write!(f, "postgres"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Where the incident database lives, as given by `--dsn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// `postgres://` or `postgresql://` connection URL
    PostgresUrl(String),
    /// Bare `host[:port]/service` form; the service is the database name
    PostgresService {
        host: String,
        port: Option<u16>,
        database: String,
    },
    /// `sqlite:` URL
    Sqlite(String),
}

impl Locator {
    pub fn parse(dsn: &str) -> Result<Self> {
        let dsn = dsn.trim();
        if dsn.is_empty() {
            return Err(ReportError::Config("Database DSN cannot be empty".to_string()));
        }

        if dsn.starts_with("sqlite:") {
            return Ok(Locator::Sqlite(dsn.to_string()));
        }

        if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
            return Ok(Locator::PostgresUrl(dsn.to_string()));
        }

        if let Some((scheme, _)) = dsn.split_once("://") {
            return Err(ReportError::Config(format!(
                "Unsupported database scheme '{}'; use postgres://, sqlite: or host[:port]/service",
                scheme
            )));
        }

        let (authority, database) = dsn.split_once('/').ok_or_else(|| {
            ReportError::Config(format!(
                "Malformed DSN '{}': expected host[:port]/service",
                dsn
            ))
        })?;

        if database.is_empty() || database.contains('/') {
            return Err(ReportError::Config(format!(
                "Malformed DSN '{}': service name is missing or invalid",
                dsn
            )));
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    ReportError::Config(format!("Malformed DSN '{}': invalid port '{}'", dsn, port))
                })?;
                (host, Some(port))
            }
            None => (authority, None),
        };

        if host.is_empty() {
            return Err(ReportError::Config(format!(
                "Malformed DSN '{}': host is missing",
                dsn
            )));
        }

        Ok(Locator::PostgresService {
            host: host.to_string(),
            port,
            database: database.to_string(),
        })
    }

    pub fn backend(&self) -> Backend {
        match self {
            Locator::PostgresUrl(_) | Locator::PostgresService { .. } => Backend::Postgres,
            Locator::Sqlite(_) => Backend::Sqlite,
        }
    }

    /// Credential-free description for logs
    pub fn describe(&self) -> String {
        match self {
            Locator::PostgresUrl(_) => "postgres (url)".to_string(),
            Locator::PostgresService { host, port, database } => match port {
                Some(port) => format!("postgres {}:{}/{}", host, port, database),
                None => format!("postgres {}/{}", host, database),
            },
            Locator::Sqlite(url) => url.clone(),
        }
    }
}

/// A single read-only connection to the incident store.
pub enum IncidentDatabase {
    Postgres(PgConnection),
    Sqlite(SqliteConnection),
}

impl IncidentDatabase {
    /// Open a connection described by the database settings
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let dsn = config
            .dsn
            .as_deref()
            .ok_or_else(|| ReportError::Config("Database DSN is required".to_string()))?;

        let locator = Locator::parse(dsn)?;
        debug!("Connecting to {}", locator.describe());

        match locator {
            Locator::Sqlite(url) => {
                let options = SqliteConnectOptions::from_str(&url)?.read_only(true);
                let conn = options.connect().await?;
                Ok(IncidentDatabase::Sqlite(conn))
            }
            locator => {
                let conn = pg_options(&locator, config)?.connect().await?;
                Ok(IncidentDatabase::Postgres(conn))
            }
        }
    }

    /// Look up one incident by id. More than one matching row is an error.
    pub async fn fetch_incident(&mut self, incident_id: i64) -> Result<Option<Incident>> {
        let rows = match self {
            IncidentDatabase::Postgres(conn) => {
                sqlx::query_as::<_, Incident>(POSTGRES_INCIDENT_QUERY)
                    .bind(incident_id)
                    .fetch_all(&mut *conn)
                    .await?
            }
            IncidentDatabase::Sqlite(conn) => {
                sqlx::query_as::<_, Incident>(SQLITE_INCIDENT_QUERY)
                    .bind(incident_id)
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        if rows.len() > 1 {
            return Err(ReportError::DuplicateIncident {
                incident_id,
                rows: rows.len(),
            });
        }

        Ok(rows.into_iter().next())
    }

    pub fn backend(&self) -> Backend {
        match self {
            IncidentDatabase::Postgres(_) => Backend::Postgres,
            IncidentDatabase::Sqlite(_) => Backend::Sqlite,
        }
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        match self {
            IncidentDatabase::Postgres(conn) => conn.close().await?,
            IncidentDatabase::Sqlite(conn) => conn.close().await?,
        }
        Ok(())
    }
}

/// Build PostgreSQL options for a locator. Explicit credentials win over
/// anything embedded in a URL, and the session is opened read-only.
pub fn pg_options(locator: &Locator, config: &DatabaseConfig) -> Result<PgConnectOptions> {
    let mut options = match locator {
        Locator::PostgresUrl(url) => PgConnectOptions::from_str(url)?,
        Locator::PostgresService { host, port, database } => {
            let options = PgConnectOptions::new().host(host).database(database);
            match port {
                Some(port) => options.port(*port),
                None => options,
            }
        }
        Locator::Sqlite(_) => {
            return Err(ReportError::Config(
                "SQLite locator cannot build PostgreSQL options".to_string(),
            ));
        }
    };

    if let Some(username) = &config.username {
        options = options.username(username);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    Ok(options.options([("default_transaction_read_only", "on")]))
}
