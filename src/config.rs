//! Drill configuration file
//!
//! All settings live in one TOML file, by default
//! `<config dir>/drillsim/drill_config.toml` (override with `DRILLSIM_CONFIG`).
//! A missing file is created with defaults on first start; every section is
//! optional and falls back to its defaults.
//!
//! ```toml
//! [drill]
//! variant = "Full"
//! hand = "Right"
//! score_per_target = 10
//! hold_seconds = 2.0
//!
//! [session]
//! length_seconds = 60.0
//!
//! [runtime]
//! tick_rate_hz = 60
//! realtime = true
//! input = "Scripted"
//! scenario = "drills/cross.toml"
//!
//! [[feedback]]
//! state = "WoodContact"
//! audio_clip = "drill_wood_contact"
//! haptic_clip = "haptic_wood_contact"
//! rotation_period = 0.5
//! ```

use crate::drill::DrillSettings;
use crate::error::DrillError;
use crate::feedback::profile::default_entries;
use crate::feedback::{ClipId, ClipLibrary, FeedbackEntry, FeedbackProfile};
use crate::scenario::Scenario;
use crate::session::SessionSettings;
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_DIR: &str = "drillsim";
const CONFIG_FILE: &str = "drill_config.toml";
const CONFIG_ENV: &str = "DRILLSIM_CONFIG";

/// Where button input comes from
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputKind {
    /// Buttons are pressed by the scenario script
    #[default]
    Scripted,
    /// Buttons are read from a gamepad; needs the `gamepad` feature
    Gamepad,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Frames per second of the tick loop
    pub tick_rate_hz: u32,
    /// Sleep between ticks; false runs the scenario as fast as possible
    pub realtime: bool,
    pub input: InputKind,
    /// Scenario file to run instead of the built-in demo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<PathBuf>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            realtime: true,
            input: InputKind::Scripted,
            scenario: None,
        }
    }
}

impl RuntimeSettings {
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }
}

/// Clip lengths used by the simulated audio and haptic backends
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClipSettings {
    pub fallback_seconds: f32,
    pub lengths: BTreeMap<String, f32>,
}

impl Default for ClipSettings {
    fn default() -> Self {
        let lengths = [
            ("drill_no_contact", 1.5),
            ("drill_wood_contact", 3.0),
            ("drill_cross_contact", 3.0),
            ("haptic_no_contact", 1.5),
            ("haptic_wood_contact", 3.0),
            ("haptic_cross_contact", 3.0),
        ]
        .into_iter()
        .map(|(name, secs)| (name.to_string(), secs))
        .collect();

        Self {
            fallback_seconds: 1.0,
            lengths,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub drill: DrillSettings,
    pub session: SessionSettings,
    pub runtime: RuntimeSettings,
    pub clips: ClipSettings,
    pub feedback: Vec<FeedbackEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drill: DrillSettings::default(),
            session: SessionSettings::default(),
            runtime: RuntimeSettings::default(),
            clips: ClipSettings::default(),
            feedback: default_entries().to_vec(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| eyre!("Failed to parse drill config: {}", e))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| eyre!("Failed to serialize drill config: {}", e))
    }

    /// Checks scalar settings; the feedback table is checked by
    /// [`Config::feedback_profile`].
    pub fn validate(&self) -> Result<(), DrillError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;

        if !positive(self.drill.hold_seconds) {
            return Err(DrillError::ConfigError(format!(
                "drill.hold_seconds must be positive, got {}",
                self.drill.hold_seconds
            )));
        }
        if !positive(self.session.length_seconds) {
            return Err(DrillError::ConfigError(format!(
                "session.length_seconds must be positive, got {}",
                self.session.length_seconds
            )));
        }
        if self.runtime.tick_rate_hz == 0 {
            return Err(DrillError::ConfigError(
                "runtime.tick_rate_hz must be at least 1".to_string(),
            ));
        }
        #[cfg(not(feature = "gamepad"))]
        if self.runtime.input == InputKind::Gamepad {
            return Err(DrillError::ConfigError(
                "runtime.input = \"Gamepad\" needs a build with the gamepad feature".to_string(),
            ));
        }
        if !positive(self.clips.fallback_seconds) {
            return Err(DrillError::ConfigError(format!(
                "clips.fallback_seconds must be positive, got {}",
                self.clips.fallback_seconds
            )));
        }
        Ok(())
    }

    pub fn feedback_profile(&self) -> Result<FeedbackProfile, DrillError> {
        FeedbackProfile::from_entries(self.feedback.iter().cloned())
    }

    pub fn clip_library(&self) -> ClipLibrary {
        let mut library = ClipLibrary::new(self.clips.fallback_seconds);
        for (name, secs) in &self.clips.lengths {
            library.insert(ClipId::new(name.as_str()), *secs);
        }
        library
    }
}

/// Location of the config file, honouring `DRILLSIM_CONFIG`
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let mut path = dirs::config_dir().ok_or_else(|| eyre!("No config directory available"))?;
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    Ok(path)
}

/// Writes the default config to `path` unless a file already exists there.
pub async fn ensure_default_config(path: &Path) -> Result<()> {
    if tokio::fs::try_exists(path)
        .await
        .map_err(|e| eyre!("Failed to check config file {}: {}", path.display(), e))?
    {
        debug!("Config file {} exists", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
    }

    let content = Config::default().to_toml()?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| eyre!("Failed to write default config: {}", e))?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}

pub async fn load_from(path: &Path) -> Result<Config> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
    let config = Config::from_toml(&text)?;
    config.validate()?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Reads the scenario named in `[runtime]`, or the built-in demo if none is set.
pub async fn load_scenario(runtime: &RuntimeSettings) -> Result<Scenario> {
    let Some(path) = runtime.scenario.as_deref() else {
        debug!("No scenario file configured, using demo");
        return Ok(Scenario::demo());
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre!("Failed to read scenario file {}: {}", path.display(), e))?;
    let scenario = Scenario::from_toml(&text)
        .map_err(|e| eyre!("Failed to parse scenario file {}: {}", path.display(), e))?;
    info!("Loaded scenario '{}' from {}", scenario.name, path.display());
    Ok(scenario)
}

/// Loads the config from its default location, creating it first if needed.
pub async fn load() -> Result<Config> {
    let path = config_path()?;
    ensure_default_config(&path).await?;
    load_from(&path).await
}
