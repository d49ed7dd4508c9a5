//! Grid configuration loading.
//!
//! - `default_grid()` - embedded `config/grid.toml`
//! - `load_grid(path)` - a user-supplied `grid.toml`
//! - `resolve_grid(dir)` - the user file if present and valid, else the defaults

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default grid embedded in the binary at compile time.
const DEFAULT_GRID: &str = include_str!("../config/grid.toml");

/// File name looked up in the app config directory.
pub const GRID_FILE_NAME: &str = "grid.toml";

/// Which browser storage area the page keeps the schedule in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    #[default]
    Session,
    Local,
}

/// Day and time-slot labels for the timetable grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub days: Vec<String>,
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub storage: StorageScope,
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_color() -> String {
    "#a5d8ff".to_string()
}

impl GridConfig {
    /// Reject grids the page cannot draw.
    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            bail!("at least one day is required");
        }
        if self.time_slots.is_empty() {
            bail!("at least one time slot is required");
        }
        if let Some(blank) = self
            .days
            .iter()
            .chain(self.time_slots.iter())
            .find(|label| label.trim().is_empty())
        {
            bail!("labels must not be blank (found {:?})", blank);
        }
        if !is_hex_color(&self.default_color) {
            bail!(
                "default_color must be a #rrggbb hex color, got {:?}",
                self.default_color
            );
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Get the default grid embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_grid() -> GridConfig {
    toml::from_str(DEFAULT_GRID).expect("embedded grid.toml must be valid TOML")
}

/// Load and validate a grid from a TOML file.
pub fn load_grid(path: &Path) -> Result<GridConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: GridConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Path of the user grid file inside `config_dir`.
pub fn grid_path(config_dir: &Path) -> PathBuf {
    config_dir.join(GRID_FILE_NAME)
}

/// Pick the grid for this session. A missing file is normal; an unreadable
/// or invalid one is logged and replaced by the defaults.
pub fn resolve_grid(config_dir: Option<&Path>) -> GridConfig {
    let Some(dir) = config_dir else {
        debug!("No config directory; using default grid");
        return default_grid();
    };

    let path = grid_path(dir);
    if !path.exists() {
        debug!("No grid file at {:?}; using default grid", path);
        return default_grid();
    }

    match load_grid(&path) {
        Ok(config) => {
            info!(
                "Loaded grid from {:?}: {} days x {} slots",
                path,
                config.days.len(),
                config.time_slots.len()
            );
            config
        }
        Err(e) => {
            warn!("Ignoring invalid grid file {:?}: {}", path, e);
            default_grid()
        }
    }
}
