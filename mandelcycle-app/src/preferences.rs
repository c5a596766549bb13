use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use mandelcycle_core::DEFAULT_MAX_ITERATIONS;
use mandelcycle_render::EngineConfig;

use crate::display_color::ColorSettings;

/// Environment override for [`AppPreferences::workers`].
pub const WORKERS_ENV: &str = "MANDELCYCLE_WORKERS";
/// Environment override for [`AppPreferences::size_in_pixels`].
pub const SIZE_ENV: &str = "MANDELCYCLE_SIZE";

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

/// Startup configuration. Grid size, iteration budget and worker count are
/// fixed for the life of the process; color settings are the initial
/// oscillator parameters and may be changed at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_size_in_pixels")]
    pub size_in_pixels: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub color: ColorSettings,
}

fn default_size_in_pixels() -> u32 {
    EngineConfig::DEFAULT_SIZE
}
fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}
fn default_workers() -> usize {
    EngineConfig::DEFAULT_WORKERS
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            size_in_pixels: default_size_in_pixels(),
            max_iterations: default_max_iterations(),
            workers: default_workers(),
            color: ColorSettings::default(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to
    /// defaults, then apply environment overrides.
    ///
    /// The overrides only live in the returned value. Saving goes through
    /// [`save_colors_to`](Self::save_colors_to), which never writes them.
    pub fn load() -> Self {
        let mut prefs = Self::load_from(&config_path());
        prefs.apply_env_overrides(|key| std::env::var(key).ok());
        prefs
    }

    /// Load preferences from `path`. A missing or unreadable file yields the
    /// defaults; the problem is logged, never fatal.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Replace only the color settings stored at `path`.
    ///
    /// The file is re-read first, so startup values and environment
    /// overrides held by the running session are not written back.
    pub fn save_colors_to(path: &Path, colors: ColorSettings) -> io::Result<()> {
        let mut stored = Self::load_from(path);
        stored.color = colors;
        stored.save_to(path)
    }

    /// Apply `MANDELCYCLE_WORKERS` / `MANDELCYCLE_SIZE` overrides read
    /// through `lookup`. Unparseable values are ignored with a warning;
    /// range checks happen when the engine is built.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(WORKERS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(workers) => {
                    debug!(workers, "Worker count overridden from environment");
                    self.workers = workers;
                }
                Err(e) => warn!("Ignoring {WORKERS_ENV}={raw:?}: {e}"),
            }
        }
        if let Some(raw) = lookup(SIZE_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(size) => {
                    debug!(size, "Grid size overridden from environment");
                    self.size_in_pixels = size;
                }
                Err(e) => warn!("Ignoring {SIZE_ENV}={raw:?}: {e}"),
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            size_in_pixels: self.size_in_pixels,
            max_iterations: self.max_iterations,
            workers: self.workers,
        }
    }
}

pub fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
