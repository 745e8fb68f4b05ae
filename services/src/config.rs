use merchant_admin_utils::version_info::RuntimeEnv;
use serde::Deserialize;
use std::env::vars;
use std::fmt::Display;
use tracing::info;

/// Rows per table page when `TABLE_PAGE_LENGTH` is not set.
pub const DEFAULT_PAGE_LENGTH: u32 = 10;

/// Upper bound for a requested table page when `TABLE_MAX_PAGE_LENGTH` is not set.
pub const DEFAULT_MAX_PAGE_LENGTH: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub enum Env {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "prod")]
    Prod,
    #[serde(rename = "internal")]
    Internal,
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "test-internal")]
    TestInternal,
    #[serde(rename = "pr")]
    Pr,
    #[serde(rename = "nightly")]
    Nightly,
}

impl From<&Env> for RuntimeEnv {
    fn from(env: &Env) -> Self {
        match env {
            Env::Local => RuntimeEnv::Local,
            Env::Prod => RuntimeEnv::Prod,
            Env::Internal => RuntimeEnv::Internal,
            Env::Test => RuntimeEnv::Test,
            Env::TestInternal => RuntimeEnv::TestInternal,
            Env::Pr => RuntimeEnv::Pr,
            Env::Nightly => RuntimeEnv::Nightly,
        }
    }
}

impl Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Prod => write!(f, "prod"),
            Env::Internal => write!(f, "internal"),
            Env::Test => write!(f, "test"),
            Env::TestInternal => write!(f, "test-internal"),
            Env::Pr => write!(f, "pr"),
            Env::Nightly => write!(f, "nightly"),
        }
    }
}

// The final, validated configuration struct.
#[derive(Debug, Clone)]
pub struct Config {
    env: Env,
    database_url: String,
    server_addr: String,
    port: u16,
    table_page_length: u32,
    table_max_page_length: u32,
}

// Raw environment variables before defaults are applied.
#[derive(Deserialize)]
struct RawConfig {
    env: Env,
    database_url: String,
    server_addr: Option<String>,
    port: Option<u16>,
    table_page_length: Option<u32>,
    table_max_page_length: Option<u32>,
}

impl Config {
    /// Create a test configuration with default values.
    ///
    /// Available to unit and integration tests; not meant for production code.
    pub fn new_for_test() -> Self {
        Self {
            env: Env::Local,
            database_url: "postgres://localhost:5432/test".to_owned(),
            server_addr: "127.0.0.1".to_owned(),
            port: 8080,
            table_page_length: DEFAULT_PAGE_LENGTH,
            table_max_page_length: DEFAULT_MAX_PAGE_LENGTH,
        }
    }

    /// Test configuration with custom table paging limits.
    pub fn new_for_test_with_paging(page_length: u32, max_page_length: u32) -> Self {
        Self {
            table_page_length: page_length,
            table_max_page_length: max_page_length,
            ..Self::new_for_test()
        }
    }

    pub fn environment(&self) -> &Env {
        &self.env
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Rows returned when a table request does not ask for a page length.
    pub fn table_page_length(&self) -> u32 {
        self.table_page_length
    }

    /// Largest page a table request may ask for.
    pub fn table_max_page_length(&self) -> u32 {
        self.table_max_page_length
    }

    /// Initializes configuration by reading from environment variables
    /// and applying environment-aware defaults.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");

        let raw_config: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw_config)
    }

    fn from_raw(raw_config: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            env,
            database_url,
            server_addr,
            port,
            table_page_length,
            table_max_page_length,
        } = raw_config;

        let server_addr = match server_addr {
            Some(addr) => {
                info!("Using provided SERVER_ADDR: {}", addr);
                addr
            }
            None => {
                let default_addr = match env {
                    Env::Local => "127.0.0.1",
                    _ => "0.0.0.0",
                };
                info!(
                    "SERVER_ADDR not set, defaulting to {} for {} environment",
                    default_addr, env
                );
                default_addr.to_owned()
            }
        };

        let port = match port {
            Some(port) => port,
            None if matches!(env, Env::Local) => {
                info!("PORT not set, defaulting to 8080 for local environment");
                8080
            }
            None => anyhow::bail!("PORT must be set for {} environment", env),
        };

        let table_max_page_length = table_max_page_length.unwrap_or(DEFAULT_MAX_PAGE_LENGTH);
        let table_page_length = table_page_length.unwrap_or(DEFAULT_PAGE_LENGTH);

        if table_max_page_length == 0 {
            anyhow::bail!("TABLE_MAX_PAGE_LENGTH must be greater than zero");
        }
        if table_page_length == 0 || table_page_length > table_max_page_length {
            anyhow::bail!(
                "TABLE_PAGE_LENGTH must be between 1 and {} (TABLE_MAX_PAGE_LENGTH), got {}",
                table_max_page_length,
                table_page_length
            );
        }

        Ok(Config {
            env,
            database_url,
            server_addr,
            port,
            table_page_length,
            table_max_page_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn default_server_addr_for_pr_is_public() {
        let raw: RawConfig = from_iter(vec![
            ("ENV", "pr"),
            ("DATABASE_URL", "postgres://example"),
            ("PORT", "8080"),
        ])
        .expect("RawConfig should deserialize");

        let config = Config::from_raw(raw).expect("pr config should build");
        assert_eq!(config.server_addr(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn local_defaults_apply_without_port() {
        let raw: RawConfig = from_iter(vec![
            ("ENV", "local"),
            ("DATABASE_URL", "postgres://example"),
        ])
        .expect("RawConfig should deserialize");

        let config = Config::from_raw(raw).expect("local config should build");
        assert_eq!(config.server_addr(), "127.0.0.1");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.table_page_length(), DEFAULT_PAGE_LENGTH);
        assert_eq!(config.table_max_page_length(), DEFAULT_MAX_PAGE_LENGTH);
        assert!(matches!(config.environment(), Env::Local));
    }

    #[test]
    fn port_required_for_prod() {
        let raw: RawConfig = from_iter(vec![
            ("ENV", "prod"),
            ("DATABASE_URL", "postgres://example"),
        ])
        .expect("RawConfig should deserialize");

        let result = Config::from_raw(raw);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PORT"));
    }

    #[test]
    fn table_paging_is_read_from_env() {
        let raw: RawConfig = from_iter(vec![
            ("ENV", "prod"),
            ("DATABASE_URL", "postgres://example"),
            ("PORT", "9000"),
            ("TABLE_PAGE_LENGTH", "25"),
            ("TABLE_MAX_PAGE_LENGTH", "50"),
        ])
        .expect("RawConfig should deserialize");

        let config = Config::from_raw(raw).expect("prod config should build");
        assert!(matches!(config.environment(), Env::Prod));
        assert_eq!(config.table_page_length(), 25);
        assert_eq!(config.table_max_page_length(), 50);
    }

    #[test]
    fn page_length_above_max_is_rejected() {
        let raw: RawConfig = from_iter(vec![
            ("ENV", "local"),
            ("DATABASE_URL", "postgres://example"),
            ("TABLE_PAGE_LENGTH", "200"),
        ])
        .expect("RawConfig should deserialize");

        let err = Config::from_raw(raw).unwrap_err().to_string();
        assert!(err.contains("TABLE_PAGE_LENGTH"));
    }

    #[test]
    fn zero_page_length_is_rejected() {
        let raw: RawConfig = from_iter(vec![
            ("ENV", "local"),
            ("DATABASE_URL", "postgres://example"),
            ("TABLE_PAGE_LENGTH", "0"),
        ])
        .expect("RawConfig should deserialize");

        assert!(Config::from_raw(raw).is_err());
    }

    #[test]
    fn env_display_matches_serde_names() {
        assert_eq!(Env::TestInternal.to_string(), "test-internal");
        assert_eq!(
            RuntimeEnv::from(Config::new_for_test().environment()),
            RuntimeEnv::Local
        );
    }
}
