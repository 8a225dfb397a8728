//! Engine tuning, loadable from YAML or JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//! ```yaml
//! damping: 0.98
//! frame_interval_ms: 16
//! scroll:
//!   bands: [0.3, 0.6, 0.9]
//! ```

use std::path::Path;
use std::time::Duration;

use ripple_kernel::{AmbientSettings, PointerRipple, ScrollWake};
use ripple_render::Palette;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest ambient margin accepted; far beyond any real grid.
const MAX_MARGIN: usize = u16::MAX as usize;

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cell edge in pixels on pointer devices.
    pub cell_size: u32,
    /// Cell edge in pixels on touch-capable devices (coarser grid).
    pub touch_cell_size: u32,
    /// Per-step decay, strictly between 0 and 1.
    pub damping: f32,
    /// Minimum time between simulated frames.
    pub frame_interval_ms: u64,
    /// Time without interaction before the frame loop stops.
    pub idle_timeout_ms: u64,
    /// Seed for ambient drop placement.
    pub seed: u64,
    pub ambient: AmbientConfig,
    pub pointer: PointerConfig,
    pub scroll: ScrollConfig,
    pub palette: Palette,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_size: 8,
            touch_cell_size: 12,
            damping: ripple_kernel::DEFAULT_DAMPING,
            frame_interval_ms: 33,
            idle_timeout_ms: 4000,
            seed: 0x5eed,
            ambient: AmbientConfig::default(),
            pointer: PointerConfig::default(),
            scroll: ScrollConfig::default(),
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub interval_ms: u64,
    pub margin: usize,
    pub strength_min: f32,
    pub strength_max: f32,
    pub radius: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        let s = AmbientSettings::default();
        Self {
            interval_ms: s.interval.as_millis() as u64,
            margin: s.margin,
            strength_min: s.strength_min,
            strength_max: s.strength_max,
            radius: s.radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub strength: f32,
    pub radius: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        let p = PointerRipple::default();
        Self {
            strength: p.strength,
            radius: p.radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Band rows as fractions of the grid height.
    pub bands: Vec<f32>,
    pub gain: f32,
    pub max_amplitude: f32,
    pub wavenumber: f32,
    pub phase_rate: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        let w = ScrollWake::default();
        Self {
            bands: w.bands,
            gain: w.gain,
            max_amplitude: w.max_amplitude,
            wavenumber: w.wavenumber,
            phase_rate: w.phase_rate,
        }
    }
}

impl EngineConfig {
    /// Load from a `.yaml`, `.yml` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that break the simulation's guarantees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let damping_ok = self.damping > 0.0 && self.damping < 1.0;
        if !damping_ok {
            return invalid(format!("damping must be in (0, 1), got {}", self.damping));
        }
        if self.cell_size == 0 || self.touch_cell_size == 0 {
            return invalid("cell sizes must be positive".into());
        }
        if self.frame_interval_ms == 0 {
            return invalid("frame_interval_ms must be positive".into());
        }
        if self.idle_timeout_ms == 0 {
            return invalid("idle_timeout_ms must be positive".into());
        }
        if self.ambient.interval_ms == 0 {
            return invalid("ambient.interval_ms must be positive".into());
        }
        if self.ambient.margin > MAX_MARGIN {
            return invalid(format!(
                "ambient.margin must be at most {MAX_MARGIN}, got {}",
                self.ambient.margin
            ));
        }
        let strengths_ok = self.ambient.strength_min <= self.ambient.strength_max;
        if !strengths_ok {
            return invalid(format!(
                "ambient strength range is empty: {}..{}",
                self.ambient.strength_min, self.ambient.strength_max
            ));
        }
        for (name, radius) in [
            ("ambient.radius", self.ambient.radius),
            ("pointer.radius", self.pointer.radius),
        ] {
            let radius_ok = radius.is_finite() && radius > 0.0;
            if !radius_ok {
                return invalid(format!("{name} must be positive, got {radius}"));
            }
        }
        if let Some(band) = self
            .scroll
            .bands
            .iter()
            .find(|b| !(0.0..=1.0).contains(*b))
        {
            return invalid(format!("scroll band {band} is outside [0, 1]"));
        }
        let scroll_ok = self.scroll.max_amplitude >= 0.0 && self.scroll.gain >= 0.0;
        if !scroll_ok {
            return invalid("scroll gain and max_amplitude must be non-negative".into());
        }
        self.validate_palette()
    }

    /// Pixels must not get darker or more transparent as `|wave|` grows.
    fn validate_palette(&self) -> Result<(), ConfigError> {
        let p = &self.palette;
        for (name, tone) in [("crest", p.crest), ("trough", p.trough)] {
            if let Some(i) = (0..3).find(|&i| tone[i] < p.base[i]) {
                return Err(ConfigError::Invalid(format!(
                    "palette.{name} channel {i} is darker than base ({} < {})",
                    tone[i], p.base[i]
                )));
            }
        }
        for (name, gain) in [
            ("positive_gain", p.positive_gain),
            ("negative_gain", p.negative_gain),
            ("field_gain", p.field_gain),
            ("caustic_strength", p.caustic_strength),
        ] {
            let gain_ok = gain.is_finite() && gain >= 0.0;
            if !gain_ok {
                return Err(ConfigError::Invalid(format!(
                    "palette.{name} must be finite and non-negative, got {gain}"
                )));
            }
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn ambient_settings(&self) -> AmbientSettings {
        AmbientSettings {
            interval: Duration::from_millis(self.ambient.interval_ms),
            margin: self.ambient.margin,
            strength_min: self.ambient.strength_min,
            strength_max: self.ambient.strength_max,
            radius: self.ambient.radius,
        }
    }

    pub fn pointer_ripple(&self) -> PointerRipple {
        PointerRipple {
            strength: self.pointer.strength,
            radius: self.pointer.radius,
        }
    }

    pub fn scroll_wake(&self) -> ScrollWake {
        ScrollWake {
            bands: self.scroll.bands.clone(),
            gain: self.scroll.gain,
            max_amplitude: self.scroll.max_amplitude,
            wavenumber: self.scroll.wavenumber,
            phase_rate: self.scroll.phase_rate,
        }
    }
}
