// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub front: FrontConfig,
    pub redirect: RedirectConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Front-end tree configuration
///
/// `path` is the single base filesystem path; the `static/` tree with its
/// `js/`, `css/` and `img/` subdirectories resolves under it.
#[derive(Debug, Deserialize, Clone)]
pub struct FrontConfig {
    pub path: String,
}

/// Canonical host redirect configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RedirectConfig {
    /// Hosts answered with the fixed redirect (bare domain and `www`)
    pub canonical_hosts: Vec<String>,
    /// Absolute URL the canonical hosts are sent to
    pub target: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub request_timeout: u64,
}

#[cfg(test)]
impl Config {
    /// Configuration mirroring the code defaults, for tests that need a
    /// starting point without touching files or the environment
    pub fn test_defaults() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9700,
                workers: None,
            },
            front: FrontConfig {
                path: ".".to_string(),
            },
            redirect: RedirectConfig {
                canonical_hosts: vec![
                    "commonsearch.org".to_string(),
                    "www.commonsearch.org".to_string(),
                ],
                target: "https://about.commonsearch.org/".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                request_timeout: 30,
            },
        }
    }
}
