use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::{RefillPolicy, SessionConfig, SessionDuration};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration: SessionDuration,
    pub initial_words: usize,
    pub refill_threshold: usize,
    pub refill_batch: usize,
    pub word_list: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            duration: session.duration,
            initial_words: session.initial_words,
            refill_threshold: session.refill.threshold,
            refill_batch: session.refill.batch_size,
            word_list: None,
        }
    }
}

impl Config {
    /// Replace values the session cannot run with. A zero refill batch would
    /// let the cursor reach the end of the text.
    pub fn validated(mut self) -> Self {
        if self.refill_batch == 0 {
            let fallback = RefillPolicy::default().batch_size;
            tracing::warn!(fallback, "refill_batch must be at least 1, using the default");
            self.refill_batch = fallback;
        }
        self
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            duration: cfg.duration,
            initial_words: cfg.initial_words,
            refill: RefillPolicy {
                threshold: cfg.refill_threshold,
                batch_size: cfg.refill_batch,
            },
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("clack_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", self.path, err);
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.validated(),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", self.path, err);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
