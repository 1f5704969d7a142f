// Configuration module entry point
// Layers the optional config file, environment overrides and code defaults

mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// Re-export public types
pub use types::{
    Config, FrontConfig, LoggingConfig, PerformanceConfig, RedirectConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("FRONT"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9700)?
            .set_default("front.path", ".")?
            .set_default(
                "redirect.canonical_hosts",
                vec!["commonsearch.org", "www.commonsearch.org"],
            )?
            .set_default("redirect.target", "https://about.commonsearch.org/")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.request_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Root of the static asset tree
    pub fn static_root(&self) -> PathBuf {
        Path::new(&self.front.path).join("static")
    }
}
