use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::decay::DecayConfig;
use crate::error::ConfigError;
use crate::session::{Tuning, DEFAULT_TARGET_COUNT, MAX_TARGET_COUNT};

/// Longest fade a target may take: ten minutes
pub const MAX_DECAY_DURATION_MS: u32 = 600_000;

/// Player preferences. Never holds scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub target_count: u32,
    pub decay_duration_ms: u32,
    pub decay_step_ms: u32,
    pub autoplay_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        let decay = DecayConfig::default();
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            decay_duration_ms: decay.duration_ms,
            decay_step_ms: decay.step_ms,
            autoplay_delay_ms: Tuning::default().autoplay_delay_ms,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_count == 0 || self.target_count > MAX_TARGET_COUNT {
            return Err(ConfigError::TargetCountOutOfRange {
                count: self.target_count,
                max: MAX_TARGET_COUNT,
            });
        }
        if self.decay_step_ms == 0 {
            return Err(ConfigError::InvalidTuning(
                "decay_step_ms must be positive".into(),
            ));
        }
        if self.decay_duration_ms == 0 || self.decay_duration_ms > MAX_DECAY_DURATION_MS {
            return Err(ConfigError::InvalidTuning(format!(
                "decay_duration_ms must be within 1..={MAX_DECAY_DURATION_MS}"
            )));
        }
        Ok(())
    }

    pub fn tuning(&self) -> Tuning {
        let decay = DecayConfig {
            duration_ms: self.decay_duration_ms,
            step_ms: self.decay_step_ms,
            ..DecayConfig::default()
        };
        Tuning {
            autoplay_delay_ms: self.autoplay_delay_ms,
            ..Tuning::with_decay(decay)
        }
    }
}

pub trait ConfigStore {
    fn try_load(&self) -> Result<Config, ConfigError>;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;

    /// Load preferences, falling back to defaults when missing or invalid
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Config::default()
            }
            Err(e) => {
                warn!(error = %e, "unusable preferences, using defaults");
                Config::default()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "tapseq") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tapseq_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path)?;
        let cfg = serde_json::from_slice::<Config>(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
