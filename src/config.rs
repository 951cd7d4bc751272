use crate::error::ArtError;
use crate::palette::Palette;
use crate::render::DEFAULT_FADE;
use crate::simulation::{clamp_complexity, ArtParams, DEFAULT_COMPLEXITY, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_FRAMES_PER_TICK: usize = 20;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    /// Version field for future compatibility
    pub version: u32,
    pub seed: String,
    pub scheme: Palette,
    pub complexity: u8,
    /// Simulated frames per rendered tick in the viewer
    pub frames_per_tick: usize,
    /// Trail fade alpha per frame (0-255)
    pub fade: u8,
}

impl ArtConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ArtError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ArtError> {
        let content = fs::read_to_string(path)?;
        let config: ArtConfig = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config.normalized())
    }

    /// `<config dir>/flowfield-art/config.json`
    pub fn default_path() -> Result<PathBuf, ArtError> {
        dirs::config_dir()
            .map(|p| p.join("flowfield-art").join("config.json"))
            .ok_or(ArtError::NoConfigDir)
    }

    /// Load the default config file if one exists; unreadable files are
    /// logged and ignored.
    pub fn load_default() -> Option<Self> {
        let path = Self::default_path().ok()?;
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable config");
                None
            }
        }
    }

    /// Bring every field into its valid range
    pub fn normalized(mut self) -> Self {
        if self.seed.is_empty() {
            self.seed = DEFAULT_SEED.to_string();
        }
        self.complexity = clamp_complexity(self.complexity as i64);
        self.frames_per_tick = self.frames_per_tick.clamp(1, MAX_FRAMES_PER_TICK);
        self
    }

    /// Generation inputs for a new session
    pub fn params(&self) -> ArtParams {
        ArtParams {
            seed: if self.seed.is_empty() {
                DEFAULT_SEED.to_string()
            } else {
                self.seed.clone()
            },
            palette: self.scheme,
            complexity: clamp_complexity(self.complexity as i64),
        }
    }
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            version: 1,
            seed: DEFAULT_SEED.to_string(),
            scheme: Palette::default(),
            complexity: DEFAULT_COMPLEXITY,
            frames_per_tick: 1,
            fade: DEFAULT_FADE,
        }
    }
}
