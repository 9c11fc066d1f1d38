use anyhow::{Context, Result};
use note_render::RenderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProfilesConfig {
    /// JSON snapshot of known profiles, read before and written after a run.
    pub cache_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Read a TOML config. A missing file means all defaults.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let expanded_path = shellexpand::tilde(path);
        let content = match fs::read_to_string(expanded_path.as_ref()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config file: {}", path))
            }
        };

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse TOML config")
    }

    pub fn validate(&self) -> Result<()> {
        let base = &self.render.link_base;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            anyhow::bail!("Link base must start with http:// or https://: {}", base);
        }

        if let Some(path) = &self.profiles.cache_path {
            if path.trim().is_empty() {
                anyhow::bail!("Profile cache path must not be empty");
            }
        }

        Ok(())
    }

    pub fn expand_paths(&mut self) {
        if let Some(path) = &self.profiles.cache_path {
            self.profiles.cache_path = Some(shellexpand::tilde(path).to_string());
        }
    }

    pub fn cache_path(&self) -> Option<PathBuf> {
        self.profiles.cache_path.as_ref().map(PathBuf::from)
    }
}
