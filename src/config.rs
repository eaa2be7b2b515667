use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::timezone::SiteTimezone;

#[derive(Parser, Debug)]
#[command(name = "blogfeed", about = "Read-only JSON feed of published blog posts")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub site: SiteConfig,
    pub api: ApiConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub upload_base_url: Option<String>,
    /// IANA zone name ("Europe/Madrid") or fixed UTC offset ("-05:00").
    #[serde(alias = "utc_offset")]
    pub timezone: String,
    pub permalink_structure: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub namespace: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            upload_base_url: None,
            timezone: "UTC".to_string(),
            permalink_structure: "/%postname%".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            namespace: "mi-api/v1".to_string(),
        }
    }
}

impl SiteConfig {
    /// Upload base URL, falling back to `<base_url>/wp-content/uploads`.
    pub fn upload_base_url(&self) -> String {
        match &self.upload_base_url {
            Some(url) => url.clone(),
            None => format!("{}/wp-content/uploads", self.base_url.trim_end_matches('/')),
        }
    }

    pub fn timezone(&self) -> anyhow::Result<SiteTimezone> {
        SiteTimezone::parse(&self.timezone)
            .with_context(|| format!("invalid site.timezone {:?}", self.timezone))
    }

    fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid site.base_url {:?}", self.base_url))?;
        let upload = self.upload_base_url();
        url::Url::parse(&upload)
            .with_context(|| format!("invalid site.upload_base_url {:?}", upload))?;
        self.timezone()?;
        Ok(())
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }

        if config.database.path.is_none() {
            config.database.path = Some(data_dir.join("blogfeed.db"));
        }

        config.site.validate()?;

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".blogfeed")
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("blogfeed.db"))
    }

    /// Route prefix for the API, e.g. `/mi-api/v1`.
    pub fn api_prefix(&self) -> String {
        format!("/{}", self.api.namespace.trim_matches('/'))
    }
}
