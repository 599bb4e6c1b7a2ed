use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::resolver::DEFAULT_EMBED_ROOT;

pub const ENV_CONTENT_WIDTH: &str = "SOUNDFAITH_EMBED_CONTENT_WIDTH";
pub const ENV_EMBED_ROOT: &str = "SOUNDFAITH_EMBED_ROOT";
pub const ENV_SETTINGS_PATH: &str = "SOUNDFAITH_EMBED_SETTINGS";

/// Host configuration: everything that is not a per-type display option.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Width of the host's content column; 600 when unset.
    #[serde(default)]
    pub content_width: Option<u32>,
    #[serde(default)]
    pub embed_root: Option<String>,
    /// Settings file for stored display options.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

impl EmbedConfig {
    /// Read a TOML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config: {}", path.display()))
    }

    /// Apply `SOUNDFAITH_EMBED_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|k| std::env::var(k).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(w) = var(ENV_CONTENT_WIDTH) {
            match w.trim().parse::<u32>() {
                Ok(w) => self.content_width = Some(w),
                Err(_) => tracing::warn!(value = %w, "ignoring invalid {ENV_CONTENT_WIDTH}"),
            }
        }
        if let Some(root) = var(ENV_EMBED_ROOT).filter(|s| !s.trim().is_empty()) {
            self.embed_root = Some(root);
        }
        if let Some(p) = var(ENV_SETTINGS_PATH).filter(|s| !s.trim().is_empty()) {
            self.settings_path = Some(PathBuf::from(p));
        }
        self
    }

    pub fn embed_root(&self) -> &str {
        self.embed_root
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_EMBED_ROOT)
    }
}
