use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label for the toggle control, naming the mode it switches to.
    pub fn toggle_label(self) -> String {
        format!("Switch to {} mode", self.toggled())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPreferences {
    theme: ThemePreference,
}

/// Owner of the process-wide theme preference.
///
/// The only mutation is [`ThemeStore::toggle`], which writes the new value
/// through to disk so the next start restores it.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    preference: ThemePreference,
    file_path: Option<PathBuf>,
}

impl ThemeStore {
    /// In-memory store that never touches disk.
    pub fn new(preference: ThemePreference) -> Self {
        Self {
            preference,
            file_path: None,
        }
    }

    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("sqa-demo");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Ok(Self::load_from(config_dir.join("preferences.json")))
    }

    /// Read the preference stored at `path`, defaulting to light when the file
    /// is missing or unreadable.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let preference = match read_preference(&path) {
            Ok(Some(p)) => p,
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable theme preference: {:#}", e);
                ThemePreference::default()
            }
        };
        tracing::info!(theme = %preference, path = %path.display(), "Theme preference loaded");

        Self {
            preference,
            file_path: Some(path),
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn is_dark(&self) -> bool {
        self.preference == ThemePreference::Dark
    }

    /// Flip light/dark and persist. The in-memory value changes even if the
    /// write fails; the error is returned for the caller to report.
    pub fn toggle(&mut self) -> Result<ThemePreference> {
        self.preference = self.preference.toggled();
        self.save()?;
        Ok(self.preference)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let content = serde_json::to_string_pretty(&PersistedPreferences {
                theme: self.preference,
            })
            .context("Failed to serialize theme preference")?;
            fs::write(path, content).context("Failed to write theme preference")?;
        }
        Ok(())
    }
}

fn read_preference(path: &Path) -> Result<Option<ThemePreference>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).context("Failed to read theme preference")?;
    let persisted: PersistedPreferences =
        serde_json::from_str(&content).context("Failed to parse theme preference")?;
    Ok(Some(persisted.theme))
}
