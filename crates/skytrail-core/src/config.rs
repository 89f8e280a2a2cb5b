use crate::catalog::{AirportCatalog, AirportSource, DEFAULT_AIRPORTS_URL};
use crate::plan::DEFAULT_CRUISE_SPEED_KMH;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.json";
const AIRPORTS_CACHE_FILE: &str = "airports.json";

/// Platform config directory, or the working directory if none is known.
pub fn config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "skytrail", "Skytrail")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_cruise_speed() -> f64 {
    DEFAULT_CRUISE_SPEED_KMH
}

fn default_frame_rate() -> u32 {
    60
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_camera_locked() -> bool {
    true
}

fn default_airports_url() -> String {
    DEFAULT_AIRPORTS_URL.to_string()
}

fn default_cache_ttl() -> u64 {
    86_400
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed_kmh: f64,
    /// Target display refresh rate for hosts that pace frames themselves.
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: u32,
    /// Fast-forward factor applied to the animation clock.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Initial camera mode for each engine.
    #[serde(default = "default_camera_locked")]
    pub camera_locked: bool,
    /// Local airports dataset; skips the download when set.
    #[serde(default)]
    pub airports_path: Option<PathBuf>,
    #[serde(default = "default_airports_url")]
    pub airports_url: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cruise_speed_kmh: default_cruise_speed(),
            frame_rate_hz: default_frame_rate(),
            time_scale: default_time_scale(),
            camera_locked: default_camera_locked(),
            airports_path: None,
            airports_url: default_airports_url(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cruise_speed_kmh.is_finite() || self.cruise_speed_kmh <= 0.0 {
            bail!("cruise_speed_kmh must be positive, got {}", self.cruise_speed_kmh);
        }
        if self.frame_rate_hz == 0 || self.frame_rate_hz > 240 {
            bail!("frame_rate_hz must be between 1 and 240, got {}", self.frame_rate_hz);
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            bail!("time_scale must be positive, got {}", self.time_scale);
        }
        Ok(())
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz.max(1)))
    }

    pub fn airport_source(&self, cache_dir: &Path) -> AirportSource {
        AirportSource::new(
            self.airports_url.clone(),
            cache_dir.join(AIRPORTS_CACHE_FILE),
            Duration::from_secs(self.cache_ttl_secs),
        )
    }

    /// Local file if configured, otherwise the cached download.
    pub fn load_catalog(&self, cache_dir: &Path) -> Result<AirportCatalog> {
        match &self.airports_path {
            Some(path) => AirportCatalog::load_file(path),
            None => self.airport_source(cache_dir).load(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::at(config_root().join(CONFIG_FILE))
    }

    pub fn at(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Directory holding the config file; the airports cache lives here too.
    pub fn dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Missing file means defaults.
    pub fn load(&self) -> Result<SimConfig> {
        if !self.config_path.exists() {
            debug!(
                "No config at {}; using defaults",
                self.config_path.display()
            );
            return Ok(SimConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).context("Failed to read config.json")?;
        let config: SimConfig =
            serde_json::from_str(&content).context("Failed to parse config.json")?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", self.config_path.display()))?;
        Ok(config)
    }

    pub fn save(&self, config: &SimConfig) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let content = config.to_pretty_json()?;
        fs::write(&self.config_path, content).context("Failed to write config.json")?;
        info!("Saved config to {}", self.config_path.display());
        Ok(())
    }
}
