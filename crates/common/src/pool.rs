//! Pool configuration for the managed MySQL instance.
//!
//! Built once from [`AppConfig`] at start-up and never mutated afterwards.

use std::path::PathBuf;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;

/// Maximum number of connections the pool keeps open.
pub const MAX_POOL_SIZE: u32 = 5;

/// Minimum number of idle connections kept warm.
pub const MIN_IDLE: u32 = 5;

/// Maximum wait for a connection checkout (1 minute).
pub const CONNECTION_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Idle connections above the minimum are closed after this long (10 minutes).
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Connections are retired after this long regardless of activity (30 minutes).
/// Must stay below the server's own `wait_timeout`.
pub const MAX_LIFETIME: Duration = Duration::from_millis(1_800_000);

/// Default MySQL port when the URL template omits one.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Directory where the Cloud SQL connector mounts instance sockets.
pub const CLOUD_SQL_SOCKET_DIR: &str = "/cloudsql";

/// How the underlying connection to the instance is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketFactory {
    /// Plain TCP to the host named in the URL template
    Tcp,
    /// Unix socket mounted by the Cloud SQL connector
    CloudSqlUnixSocket,
}

impl std::fmt::Display for SocketFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocketFactory::Tcp => write!(f, "tcp"),
            SocketFactory::CloudSqlUnixSocket => write!(f, "cloud-sql-unix-socket"),
        }
    }
}

/// Preferred IP type the connector uses to reach the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpType {
    Public,
    Private,
    Psc,
}

impl std::fmt::Display for IpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpType::Public => write!(f, "PUBLIC"),
            IpType::Private => write!(f, "PRIVATE"),
            IpType::Psc => write!(f, "PSC"),
        }
    }
}

impl std::str::FromStr for IpType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(IpType::Public),
            "PRIVATE" => Ok(IpType::Private),
            "PSC" => Ok(IpType::Psc),
            other => Err(AppError::Config(format!(
                "DB_IP_TYPE must be PUBLIC, PRIVATE or PSC, got {other:?}"
            ))),
        }
    }
}

/// Resolved network endpoint of the database server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Tcp { host: String, port: u16 },
    UnixSocket(PathBuf),
}

/// Immutable connection pool configuration.
#[derive(Clone)]
pub struct PoolConfig {
    pub instance_connection_name: String,
    pub username: String,
    password: String,
    pub database: String,
    pub endpoint: Endpoint,
    pub max_pool_size: u32,
    pub min_idle: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub socket_factory: SocketFactory,
    pub ip_type: IpType,
}

impl PoolConfig {
    /// Build the pool configuration from application settings.
    ///
    /// Fails with [`AppError::Config`] when the instance name or URL template
    /// is malformed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AppError> {
        validate_instance_name(&config.instance_connection_name)?;

        if config.db_name.trim().is_empty() {
            return Err(AppError::Config("DB_NAME must not be empty".to_string()));
        }

        let endpoint = parse_endpoint(&config.jdbc_url, &config.instance_connection_name)?;
        let socket_factory = match endpoint {
            Endpoint::Tcp { .. } => SocketFactory::Tcp,
            Endpoint::UnixSocket(_) => SocketFactory::CloudSqlUnixSocket,
        };

        Ok(Self {
            instance_connection_name: config.instance_connection_name.clone(),
            username: config.db_user.clone(),
            password: config.db_pass.clone(),
            database: config.db_name.clone(),
            endpoint,
            max_pool_size: MAX_POOL_SIZE,
            min_idle: MIN_IDLE,
            connection_timeout: CONNECTION_TIMEOUT,
            idle_timeout: IDLE_TIMEOUT,
            max_lifetime: MAX_LIFETIME,
            socket_factory,
            ip_type: config.ip_type,
        })
    }

    /// Fully-resolved connection URL with host, port and database filled in.
    /// Never includes credentials.
    pub fn jdbc_url(&self) -> String {
        match &self.endpoint {
            Endpoint::Tcp { host, port } => {
                format!("jdbc:mysql://{}:{}/{}", host, port, self.database)
            }
            Endpoint::UnixSocket(path) => format!(
                "jdbc:mysql:///{}?unixSocketPath={}",
                self.database,
                path.display()
            ),
        }
    }

    /// sqlx connection options for a single connection.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .username(&self.username)
            .password(&self.password)
            .database(&self.database);

        match &self.endpoint {
            Endpoint::Tcp { host, port } => options.host(host).port(*port),
            Endpoint::UnixSocket(path) => options.socket(path),
        }
    }

    /// sqlx pool options carrying the sizing and timeout limits.
    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.max_pool_size)
            .min_connections(self.min_idle)
            .acquire_timeout(self.connection_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("instance_connection_name", &self.instance_connection_name)
            .field("jdbc_url", &self.jdbc_url())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("max_pool_size", &self.max_pool_size)
            .field("min_idle", &self.min_idle)
            .field("connection_timeout", &self.connection_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .field("socket_factory", &self.socket_factory)
            .field("ip_type", &self.ip_type)
            .finish()
    }
}

fn validate_instance_name(name: &str) -> Result<(), AppError> {
    let parts: Vec<&str> = name.split(':').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.trim().is_empty()) {
        return Err(AppError::Config(format!(
            "INSTANCE_CONNECTION_NAME must look like project:region:instance, got {name:?}"
        )));
    }
    Ok(())
}

/// Resolve the server endpoint from a `jdbc:mysql://host[:port]/db` template.
///
/// A template without a host (`jdbc:mysql:///db`) routes through the Cloud SQL
/// unix socket for the instance.
fn parse_endpoint(template: &str, instance: &str) -> Result<Endpoint, AppError> {
    let raw = template.strip_prefix("jdbc:").unwrap_or(template);
    let url = Url::parse(raw)
        .map_err(|e| AppError::Config(format!("JDBC_URL is not a valid URL: {e}")))?;

    if url.scheme() != "mysql" {
        return Err(AppError::Config(format!(
            "JDBC_URL must use the mysql scheme, got {:?}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(Endpoint::Tcp {
            host: host.to_string(),
            port: url.port().unwrap_or(DEFAULT_MYSQL_PORT),
        }),
        _ => Ok(Endpoint::UnixSocket(
            PathBuf::from(CLOUD_SQL_SOCKET_DIR).join(instance),
        )),
    }
}
