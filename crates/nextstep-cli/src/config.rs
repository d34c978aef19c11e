//! CLI settings
//!
//! Built-in defaults, then an optional TOML/YAML file, then `NEXTSTEP_*`
//! environment variables, each layer overriding the previous one.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use nextstep_client::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: i64 = 30;
const ENV_PREFIX: &str = "NEXTSTEP";

const TOKENS_FILE: &str = "session.json";
const REDIRECT_FILE: &str = "redirect.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Origin serving the booking API
    pub base_url: String,

    /// Interface language tag
    pub locale: String,

    /// Request timeout in seconds (0 = none)
    pub timeout_secs: u64,

    /// Where session files are kept
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings, reading `path` if given or the platform config file if present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("locale", Locale::default().as_str())?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading settings file");
            builder = builder.add_source(config::File::from(path));
        } else if let Some(dirs) = project_dirs() {
            let default_file = dirs.config_dir().join("config.toml");
            builder = builder.add_source(config::File::from(default_file).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read settings")?;

        settings
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn locale(&self) -> Locale {
        Locale::from_tag_or_default(&self.locale)
    }

    /// Directory for session files, falling back to the platform data dir
    pub fn state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }

        if let Some(dirs) = project_dirs() {
            dirs.data_dir().to_path_buf()
        } else {
            warn!("Failed to determine platform-specific directories, using ./.nextstep");
            PathBuf::from("./.nextstep")
        }
    }

    pub fn tokens_file(&self) -> PathBuf {
        self.state_dir().join(TOKENS_FILE)
    }

    pub fn redirect_file(&self) -> PathBuf {
        self.state_dir().join(REDIRECT_FILE)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("pl", "NextStepPro", "nextstep")
}
