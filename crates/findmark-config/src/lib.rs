use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid [search] setting `{field}`: {reason}")]
    InvalidSearchSetting { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub pages_path: PathBuf,
    #[serde(default)]
    pub search: SearchConfig,
}

/// The `[search]` table. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Element tag used for highlight markers
    pub highlight_tag: String,
    /// Class that identifies a highlight marker
    pub highlight_class: String,
    /// Decorative classes added to every marker
    pub extra_classes: Vec<String>,
    /// Tags whose text is never searched
    pub excluded_tags: Vec<String>,
    /// Classes whose subtree is never searched
    pub excluded_classes: Vec<String>,
    /// Delay before scrolling to the first match
    pub scroll_delay_ms: u64,
    pub smooth_scroll: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            highlight_tag: "mark".to_string(),
            highlight_class: "highlight".to_string(),
            extra_classes: Vec::new(),
            excluded_tags: vec!["script".to_string(), "style".to_string()],
            excluded_classes: vec!["search-container".to_string()],
            scroll_delay_ms: 100,
            smooth_scroll: true,
        }
    }
}

impl SearchConfig {
    /// Reject settings that would make markers unrecognisable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.highlight_tag.trim().is_empty() {
            return Err(ConfigError::InvalidSearchSetting {
                field: "highlight_tag",
                reason: "must not be empty".to_string(),
            });
        }
        if self.highlight_class.trim().is_empty() {
            return Err(ConfigError::InvalidSearchSetting {
                field: "highlight_class",
                reason: "must not be empty".to_string(),
            });
        }
        if self
            .excluded_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&self.highlight_tag))
        {
            return Err(ConfigError::InvalidSearchSetting {
                field: "excluded_tags",
                reason: format!("cannot exclude the highlight tag `{}`", self.highlight_tag),
            });
        }
        Ok(())
    }
}

impl Config {
    pub fn new(pages_path: impl Into<PathBuf>) -> Self {
        Self {
            pages_path: pages_path.into(),
            search: SearchConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded pages path
        config.pages_path = Self::expand_path(&config.pages_path).unwrap_or(config.pages_path);
        config.search.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/findmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
