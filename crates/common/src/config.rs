use crate::error::AppError;
use crate::pool::IpType;

/// Global application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// Managed instance identifier, `project:region:instance`
    pub instance_connection_name: String,

    /// Base connection URL template, e.g. `jdbc:mysql://10.0.0.3:3306/votes_db`
    pub jdbc_url: String,

    /// Pool connection username
    pub db_user: String,

    /// Pool connection password
    pub db_pass: String,

    /// Target database name
    pub db_name: String,

    /// Preferred IP type for the instance connector (default: PRIVATE)
    pub ip_type: IpType,

    /// HTTP listen port (default: 8080)
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .ok_or_else(|| AppError::Config(format!("{key} environment variable is required")))
        };

        Ok(Self {
            instance_connection_name: required("INSTANCE_CONNECTION_NAME")?,
            jdbc_url: required("JDBC_URL")?,
            db_user: required("DB_USER")?,
            db_pass: required("DB_PASS")?,
            db_name: required("DB_NAME")?,
            ip_type: lookup("DB_IP_TYPE")
                .unwrap_or_else(|| "PRIVATE".to_string())
                .parse()?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .map_err(|_| AppError::Config("PORT must be a valid u16".to_string()))?,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("instance_connection_name", &self.instance_connection_name)
            .field("jdbc_url", &self.jdbc_url)
            .field("db_user", &self.db_user)
            .field("db_pass", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("ip_type", &self.ip_type)
            .field("port", &self.port)
            .finish()
    }
}
