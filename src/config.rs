//! Application configuration.
//!
//! Layering, lowest to highest priority: built-in defaults → config file
//! (`--config` / `CONFIG_FILE`, or `./config.yaml` when present) →
//! `TICKETDESK_`-prefixed environment variables (`__` separator, e.g.
//! `TICKETDESK_SERVER__PORT`) → CLI flags.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the ticketing backend
    #[arg(long, env = "BACKEND_BASE_URL")]
    pub backend_url: Option<String>,

    /// Mark session cookies Secure (set in production)
    #[arg(long, env = "COOKIE_SECURE")]
    pub cookie_secure: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL of the JSON-over-HTTP ticketing backend.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("backend.base_url", "http://localhost:8080")?
            .set_default("session.cookie_secure", false)?;

        // Config file: explicit path wins; otherwise pick up ./config.yaml
        // when one exists.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml"));
        }

        // Environment variables, e.g. TICKETDESK_BACKEND__BASE_URL.
        builder = builder.add_source(
            Environment::with_prefix("TICKETDESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags override everything. Clap also resolves the flag-level
        // env vars (PORT, BACKEND_BASE_URL, COOKIE_SECURE) before we get
        // here, so those participate at this priority too.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(base_url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", base_url)?;
        }
        if let Some(secure) = cli.cookie_secure {
            builder = builder.set_override("session.cookie_secure", secure)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;

        Url::parse(&cfg.backend.base_url).map_err(|err| {
            config::ConfigError::Message(format!(
                "backend.base_url is not a valid URL ({}): {err}",
                cfg.backend.base_url
            ))
        })?;

        Ok(cfg)
    }
}
