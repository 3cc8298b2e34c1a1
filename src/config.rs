use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::analysis::MAX_DURATION;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_max_duration")]
    pub max_duration: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub json: bool,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            max_duration: default_max_duration(),
        }
    }
}

fn default_max_duration() -> f32 { MAX_DURATION }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// `./loopscribe.toml`, then `~/.config/loopscribe/config.toml`, then the
/// platform config directory.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from("loopscribe.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("loopscribe").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("loopscribe").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
