use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "social.toml",
    "config/social.toml",
    "crates/config/social.toml",
    "../social.toml",
    "../config/social.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "AppConfig::default_env")]
    pub env: String,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl AppConfig {
    fn default_env() -> String {
        "development".to_string()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    #[serde(default = "HttpConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl HttpConfig {
    const fn default_request_timeout() -> u64 {
        60
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Connection pool and per-call limits for the SQLite store.
///
/// ```
/// use social_config::DatabaseConfig;
///
/// let database = DatabaseConfig::default();
/// assert_eq!(database.max_connections, 30);
/// assert_eq!(database.query_timeout_ms, 5_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_query_timeout")]
    pub query_timeout_ms: u64,
    #[serde(default = "DatabaseConfig::default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    const fn default_query_timeout() -> u64 {
        5_000
    }

    const fn default_busy_timeout() -> u64 {
        5_000
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://social.db".to_string(),
            max_connections: 30,
            query_timeout_ms: Self::default_query_timeout(),
            busy_timeout_ms: Self::default_busy_timeout(),
        }
    }
}

/// Bounds applied to feed pagination requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "FeedConfig::default_limit")]
    pub default_limit: i64,
    #[serde(default = "FeedConfig::default_max_limit")]
    pub max_limit: i64,
    #[serde(default = "FeedConfig::default_max_tags")]
    pub max_tags: usize,
    #[serde(default = "FeedConfig::default_max_search_len")]
    pub max_search_len: usize,
}

impl FeedConfig {
    const fn default_limit() -> i64 {
        20
    }

    const fn default_max_limit() -> i64 {
        20
    }

    const fn default_max_tags() -> usize {
        5
    }

    const fn default_max_search_len() -> usize {
        100
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::default_limit(),
            max_limit: Self::default_max_limit(),
            max_tags: Self::default_max_tags(),
            max_search_len: Self::default_max_search_len(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use social_config::load;
///
/// std::env::remove_var("SOCIAL_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let builder = config::Config::builder()
        .set_default("env", defaults.env.clone())?
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default(
            "http.request_timeout_seconds",
            clamp_to_i64(defaults.http.request_timeout_seconds),
        )?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default(
            "database.query_timeout_ms",
            clamp_to_i64(defaults.database.query_timeout_ms),
        )?
        .set_default(
            "database.busy_timeout_ms",
            clamp_to_i64(defaults.database.busy_timeout_ms),
        )?
        .set_default("feed.default_limit", defaults.feed.default_limit)?
        .set_default("feed.max_limit", defaults.feed.max_limit)?
        .set_default("feed.max_tags", defaults.feed.max_tags as i64)?
        .set_default("feed.max_search_len", defaults.feed.max_search_len as i64)?;

    let mut builder = builder;
    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("SOCIAL_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via SOCIAL_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(config::Environment::with_prefix("SOCIAL").separator("__"));

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
