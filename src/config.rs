use std::env;

use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_port: u16,
    pub db_max_connections: u32,
    /// How long a request may wait for a pooled connection, including
    /// reconnect attempts while the database is unreachable.
    pub db_acquire_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
    /// When false, 500 responses carry only the generic message; the driver
    /// error still goes to the log.
    pub expose_error_details: bool,
}

/// Allowed cross-origin callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return CorsOrigins::Any;
        }
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Development fallbacks, used for every variable that is not set.
impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_host: "localhost".into(),
            db_user: "postgres".into(),
            db_password: "123456".into(),
            db_name: "adrdb".into(),
            db_port: 5432,
            db_max_connections: 10,
            db_acquire_timeout_secs: 30,
            host: "0.0.0.0".into(),
            port: 1337,
            cors_origins: CorsOrigins::Any,
            expose_error_details: true,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            db_user: env::var("DB_USER").unwrap_or_else(|_| "postgres".into()),
            db_password: env::var("DB_PASSWORD").unwrap_or_else(|_| "123456".into()),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "adrdb".into()),
            db_port: parsed("DB_PORT", "5432")?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "10")?,
            db_acquire_timeout_secs: parsed("DB_ACQUIRE_TIMEOUT_SECS", "30")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parsed("PORT", "1337")?,
            cors_origins: CorsOrigins::parse(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),
            expose_error_details: parse_bool(
                "EXPOSE_ERROR_DETAILS",
                &env::var("EXPOSE_ERROR_DETAILS").unwrap_or_else(|_| "true".into()),
            )?,
        })
    }

    /// Connection options for the pool. `DATABASE_URL` wins over the
    /// individual `DB_*` parts.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.database_url {
            return url
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL: {}", e));
        }
        Ok(PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name))
    }
}

fn parsed<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.into());
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {:?} ({})", key, raw, e))
}

fn parse_bool(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("Invalid value for {}: {:?}", key, other)),
    }
}
