use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::internal::ui::app::Action;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub gallery: GalleryConfig,
    pub jokes: JokesConfig,
    pub logging: LoggingConfig,
    /// Optional JSON palette file with "light" and "dark" variants
    /// (e.g. "./themes/solarized.json"). Built-in palettes are used when unset.
    pub theme_file: Option<String>,
    /// Per-context key overrides, e.g. `global: {"T": ToggleTheme}`.
    pub keybindings: Option<KeyBindingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the photo listing and image API.
    pub photos_base_url: String,
    /// Base URL of the joke listing API.
    pub jokes_base_url: String,
    /// Number of photos requested from page 1 of the listing.
    pub photo_limit: u32,
    /// No timeout when unset; a stalled response keeps the view loading.
    pub request_timeout_secs: Option<u64>,
    /// Maximum number of photo downloads in flight per gallery activation.
    pub image_concurrency: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            photos_base_url: "https://picsum.photos".to_string(),
            jokes_base_url: "https://official-joke-api.appspot.com".to_string(),
            photo_limit: 12,
            request_timeout_secs: None,
            image_concurrency: 4,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GalleryConfig {
    /// Width in pixels every photo is requested at; heights follow the aspect ratio.
    pub target_width: u32,
    pub loading_placeholders: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            target_width: 400,
            loading_placeholders: 12,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct JokesConfig {
    pub loading_placeholders: usize,
}

impl Default for JokesConfig {
    fn default() -> Self {
        Self {
            loading_placeholders: 6,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub level: String,
    /// Per-module overrides appended to the filter, e.g. `{"sqa_demo::api": "debug"}`.
    pub module_levels: HashMap<String, String>,
    pub log_directory: Option<String>,
    pub enable_performance_metrics: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            module_levels: HashMap::new(),
            log_directory: None,
            enable_performance_metrics: false,
        }
    }
}

impl LoggingConfig {
    /// Filter directive built from the configured level and module overrides.
    pub fn filter_directive(&self) -> String {
        let mut filter_str = self.level.clone();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort();
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindingConfig {
    pub global: HashMap<String, Action>,
    pub gallery: HashMap<String, Action>,
    pub jokes: HashMap<String, Action>,
    pub not_found: HashMap<String, Action>,
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match ron::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }
}
