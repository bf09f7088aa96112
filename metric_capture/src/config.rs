//! Recorder configuration (strict YAML).

use std::{fs, path::PathBuf};

use serde::Deserialize;

use crate::RecorderError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecorderConfig {
    /// CSV file rewritten with the totals on every flush. No output when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_flush_on_exit")]
    pub flush_on_exit: bool,
}

fn default_flush_on_exit() -> bool {
    true
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output: None,
            flush_on_exit: default_flush_on_exit(),
        }
    }
}

impl RecorderConfig {
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<(), RecorderError> {
        match &self.output {
            Some(path) if path.as_os_str().is_empty() => {
                Err(RecorderError::Config("output must not be empty".into()))
            }
            _ => Ok(()),
        }
    }
}

pub fn load_from_file(path: &str) -> Result<RecorderConfig, RecorderError> {
    let s = fs::read_to_string(path)?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RecorderConfig, RecorderError> {
    let cfg: RecorderConfig = serde_yaml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}
