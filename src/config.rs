use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Light,
    Monochrome,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub initially_expanded: bool,
    pub enable_clipboard: bool,
    pub show_help: bool,
    pub theme: ThemeName,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initially_expanded: true,
            enable_clipboard: true,
            show_help: true,
            theme: ThemeName::Default,
        }
    }
}

impl Config {
    /// Config for hosts that must not touch the clipboard.
    pub fn read_only(mut self) -> Self {
        self.enable_clipboard = false;
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads the config at `path` if given, else the per-user config file.
    /// A missing per-user file yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

// Get the config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("snappy-tree").join("config.toml"))
}
