//! Host settings
//!
//! Stored as JSON. Gameplay constants live in [`crate::consts`] and are not
//! configurable here.

use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::sim::context::Arena;

/// Who drives the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    #[default]
    Computer,
    Human,
}

impl Opponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Opponent::Computer => "computer",
            Opponent::Human => "human",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "computer" | "ai" | "cpu" => Some(Opponent::Computer),
            "human" => Some(Opponent::Human),
            _ => None,
        }
    }
}

/// Match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f32,
    pub arena_height: f32,
    /// RNG seed for launch angles and spawn owners
    pub seed: u64,
    pub opponent: Opponent,
    /// Start with the FPS overlay visible
    pub show_fps: bool,
    /// Simulated match length for the headless driver (ms)
    pub run_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let arena = Arena::default();
        Self {
            arena_width: arena.width,
            arena_height: arena.height,
            seed: 0x5eed,
            opponent: Opponent::Computer,
            show_fps: false,
            run_ms: 60_000.0,
        }
    }
}

impl Settings {
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not read {}: {err}, using default settings", path.display());
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Malformed settings in {}: {err}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
