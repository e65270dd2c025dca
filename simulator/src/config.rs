//! Runtime configuration for the simulator.
//!
//! Settings come from an optional TOML file; every key has a default so an
//! empty file (or no file) gives a working 64x64 dashboard for Chicago. The
//! weather API key can also be supplied through `WEATHERAPI_KEY`, which wins
//! over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use matrix_common::config::{LOADING_DURATION, MATRIX_HEIGHT, MATRIX_WIDTH};
use serde::{Deserialize, Serialize};

/// Environment variable holding the weatherapi.com key.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Location query sent to the weather service.
    pub location: String,
    /// Matrix height in pixels.
    pub rows: u32,
    /// Matrix width in pixels.
    pub cols: u32,
    /// Window pixels per matrix pixel.
    pub scale: u32,
    /// Steady-state frame time.
    pub frame_time_ms: u64,
    /// Loading spinner length.
    pub loading_secs: u64,
    /// Time between weather refreshes.
    pub refresh_secs: u64,
    /// Connect and read timeout for every HTTP request.
    pub fetch_timeout_secs: u64,
    pub api_key: Option<String>,
    /// Base directory for image sequences. Relative paths resolve against
    /// the config file's directory.
    pub assets_root: PathBuf,
    /// Write the last presented frame here as PNG on exit.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            location: "Chicago".to_string(),
            rows: MATRIX_HEIGHT,
            cols: MATRIX_WIDTH,
            scale: 8,
            frame_time_ms: 50,
            loading_secs: LOADING_DURATION.as_secs(),
            refresh_secs: 600,
            fetch_timeout_secs: 5,
            api_key: None,
            assets_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
            snapshot_path: None,
        }
    }
}

impl DashboardConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> { toml::from_str(text).context("invalid configuration") }

    /// Load `path`, or the defaults when no path is given.
    ///
    /// A relative `assets_root` in the file is resolved against the file's
    /// directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config = Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?;

        if config.assets_root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.assets_root = base.join(&config.assets_root);
        }
        Ok(config)
    }

    /// Take the API key from `value` when it is set and non-empty.
    pub fn apply_api_key_override(
        &mut self,
        value: Option<String>,
    ) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Apply environment overrides (`WEATHERAPI_KEY`).
    pub fn apply_env(&mut self) { self.apply_api_key_override(std::env::var(API_KEY_ENV).ok()); }

    /// Reject settings the renderer cannot use.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.rows > 0 && self.cols > 0, "matrix size must be non-zero, got {}x{}", self.cols, self.rows);
        anyhow::ensure!(self.scale > 0, "scale must be at least 1");
        anyhow::ensure!(self.frame_time_ms > 0, "frame_time_ms must be at least 1");
        anyhow::ensure!(self.refresh_secs > 0, "refresh_secs must be at least 1");
        anyhow::ensure!(self.fetch_timeout_secs > 0, "fetch_timeout_secs must be at least 1");
        Ok(())
    }

    /// Resolve an asset path. Absolute paths are returned unchanged.
    pub fn asset_path(
        &self,
        path: &Path,
    ) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.assets_root.join(path) }
    }

    pub fn frame_time(&self) -> Duration { Duration::from_millis(self.frame_time_ms) }

    pub fn loading_duration(&self) -> Duration { Duration::from_secs(self.loading_secs) }

    pub fn refresh_interval(&self) -> Duration { Duration::from_secs(self.refresh_secs) }

    pub fn fetch_timeout(&self) -> Duration { Duration::from_secs(self.fetch_timeout_secs) }
}
