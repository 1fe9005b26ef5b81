// Sun Oct 18 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pool_size: usize,
    pub upper_limit: u64,
    pub segment_size: u64,
    pub shutdown_grace_ms: u64,
    pub progress_steps: u64,
    pub poll_interval_ms: u64,
    pub worker_name_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_size: 10,
            upper_limit: 200_000_000,
            segment_size: 2_000_000,
            shutdown_grace_ms: 600_000,
            progress_steps: 10,
            poll_interval_ms: 50,
            worker_name_prefix: "prime-worker".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_upper_limit(mut self, upper_limit: u64) -> Self {
        self.upper_limit = upper_limit;
        self
    }

    pub fn with_segment_size(mut self, segment_size: u64) -> Self {
        self.segment_size = segment_size;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace_ms = grace.as_millis() as u64;
        self
    }

    pub fn with_progress_steps(mut self, steps: u64) -> Self {
        self.progress_steps = steps;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_worker_name_prefix(mut self, prefix: &str) -> Self {
        self.worker_name_prefix = prefix.to_string();
        self
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn segment_count(&self) -> usize {
        if self.segment_size == 0 {
            return 0;
        }
        self.upper_limit.div_ceil(self.segment_size) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Validation(message.to_string()));

        if self.pool_size == 0 {
            return invalid("pool_size must be greater than 0");
        }
        if self.upper_limit == 0 {
            return invalid("upper_limit must be greater than 0");
        }
        if self.segment_size == 0 {
            return invalid("segment_size must be greater than 0");
        }
        if self.shutdown_grace_ms == 0 {
            return invalid("shutdown_grace_ms must be greater than 0");
        }
        if self.progress_steps == 0 {
            return invalid("progress_steps must be greater than 0");
        }
        if self.poll_interval_ms == 0 {
            return invalid("poll_interval_ms must be greater than 0");
        }
        if self.worker_name_prefix.trim().is_empty() {
            return invalid("worker_name_prefix must not be empty");
        }
        Ok(())
    }

    /// Loads a JSON config. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "json" => {
                let contents = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&contents)?)
            }
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, contents)?;
        Ok(())
    }
}
