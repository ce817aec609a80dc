//! Simulation settings
//!
//! Loaded from JSON by the native runner; the browser host builds them from
//! its controls. Nothing here is saved between sessions.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CELL_SIZE, DEFAULT_TURN_INTERVAL_MS, MAX_SLIDER_INTERVAL_MS, MIN_SLIDER_INTERVAL_MS,
};
use crate::error::{SimError, SimResult};
use crate::sim::{Cadence, InitialPlacement, validate_interval};

/// Named turn speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
    Turbo,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Normal => "Normal",
            SpeedPreset::Fast => "Fast",
            SpeedPreset::Turbo => "Turbo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" | "default" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            "turbo" => Some(SpeedPreset::Turbo),
            _ => None,
        }
    }

    /// Milliseconds between turns
    pub fn interval_ms(&self) -> f64 {
        match self {
            SpeedPreset::Slow => MAX_SLIDER_INTERVAL_MS,
            SpeedPreset::Normal => DEFAULT_TURN_INTERVAL_MS,
            SpeedPreset::Fast => 150.0,
            SpeedPreset::Turbo => MIN_SLIDER_INTERVAL_MS,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Named speed, used when no explicit interval is set
    pub speed: SpeedPreset,
    /// Explicit ms per turn (overrides `speed`)
    pub turn_interval_ms: Option<f64>,
    /// How the scheduler keeps time between turns
    pub cadence: Cadence,
    /// Whether space 0 counts as visited before the first roll
    pub initial_placement: InitialPlacement,
    /// Dice seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Board cell size in pixels (presentation hint)
    pub cell_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SpeedPreset::Normal,
            turn_interval_ms: None,
            cadence: Cadence::DriftAccepting,
            initial_placement: InitialPlacement::Uncounted,
            seed: None,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl Settings {
    /// Create settings from a speed preset
    pub fn from_preset(preset: SpeedPreset) -> Self {
        Self {
            speed: preset,
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Interval the simulation should run at
    pub fn effective_interval_ms(&self) -> f64 {
        self.turn_interval_ms.unwrap_or_else(|| self.speed.interval_ms())
    }

    /// Reject unusable values
    pub fn validate(&self) -> SimResult<()> {
        validate_interval(self.effective_interval_ms())?;
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SimError::InvalidCellSize {
                size: self.cell_size,
            });
        }
        Ok(())
    }

    /// Slider position for the current interval, clamped to the slider range
    pub fn slider_value(&self) -> f64 {
        self.effective_interval_ms()
            .clamp(MIN_SLIDER_INTERVAL_MS, MAX_SLIDER_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.effective_interval_ms(), 500.0);
        assert_eq!(settings.cadence, Cadence::DriftAccepting);
        assert_eq!(settings.initial_placement, InitialPlacement::Uncounted);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_override_beats_preset() {
        let mut settings = Settings::from_preset(SpeedPreset::Turbo);
        assert_eq!(settings.effective_interval_ms(), 50.0);
        settings.turn_interval_ms = Some(75.0);
        assert_eq!(settings.effective_interval_ms(), 75.0);
    }

    #[test]
    fn test_partial_json() {
        let settings =
            Settings::from_json(r#"{"speed":"Fast","cadence":"fixed_increment","seed":7}"#)
                .unwrap();
        assert_eq!(settings.speed, SpeedPreset::Fast);
        assert_eq!(settings.cadence, Cadence::FixedIncrement);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.cell_size, DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_json_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{"turn_interval_ms":0}"#),
            Err(SimError::InvalidInterval { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"cell_size":-1}"#),
            Err(SimError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SimError::Settings(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::from_preset(SpeedPreset::Slow);
        settings.initial_placement = InitialPlacement::CountStart;
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(SpeedPreset::from_str("TURBO"), Some(SpeedPreset::Turbo));
        assert_eq!(SpeedPreset::from_str("ludicrous"), None);
        assert_eq!(SpeedPreset::Slow.as_str(), "Slow");
    }

    #[test]
    fn test_slider_clamp() {
        let mut settings = Settings::default();
        settings.turn_interval_ms = Some(5.0);
        assert_eq!(settings.slider_value(), MIN_SLIDER_INTERVAL_MS);
    }
}
