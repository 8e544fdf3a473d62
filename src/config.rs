use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::steam::{DEFAULT_BASE_URL, DEFAULT_INTERVAL, DEFAULT_PAGE_SIZE};
use crate::{Error, Result};

pub const DEFAULT_APP_ID: u32 = 730;
pub const DEFAULT_QUERY: &str = "кейс";
pub const DEFAULT_OUTPUT_DIR: &str = "resultfile";

/// Download the price history of every market item matching a query.
#[derive(Debug, clap::Parser)]
#[command(name = "steam-pricehistory", version)]
pub struct Args {
    /// App the items belong to [default: 730]
    #[arg(long)]
    pub appid: Option<u32>,

    /// Free text search query, matched case-insensitively by the market [default: кейс]
    #[arg(long)]
    pub query: Option<String>,

    /// Directory the per-item CSV files are written to [default: resultfile]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Minimum number of seconds between two requests [default: 6]
    #[arg(long)]
    pub delay_secs: Option<u64>,

    /// Number of search results requested per page [default: 100]
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Optional YAML file with the same settings plus extra headers
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Value of the steamLoginSecure cookie
    #[arg(long, env = "STEAM_LOGIN_SECURE", hide_env_values = true)]
    pub login_secure: Option<String>,

    /// Log more, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub app_id: u32,
    pub query: String,
    pub output_dir: PathBuf,
    pub request_delay_secs: u64,
    pub page_size: u32,
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip)]
    pub login_secure: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID,
            query: DEFAULT_QUERY.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            request_delay_secs: DEFAULT_INTERVAL.as_secs(),
            page_size: DEFAULT_PAGE_SIZE,
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: BTreeMap::new(),
            login_secure: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&raw).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Command line flags win over the config file, which wins over the defaults.
    pub fn load(args: Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(app_id) = args.appid {
            config.app_id = app_id;
        }
        if let Some(query) = args.query {
            config.query = query;
        }
        if let Some(output_dir) = args.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(delay) = args.delay_secs {
            config.request_delay_secs = delay;
        }
        if let Some(page_size) = args.page_size {
            config.page_size = page_size;
        }
        config.login_secure = args.login_secure;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_id == 0 {
            return Err(Error::InvalidConfig("app_id must be positive".to_string()));
        }
        if self.page_size == 0 {
            return Err(Error::InvalidConfig("page_size must be positive".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("base_url must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }
}
