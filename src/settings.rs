//! Engine configuration and presets
//!
//! Loaded once at startup; immutable once handed to a `WarpState`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, WarpError};
use crate::sim::effect::DistortionSource;
use crate::sim::gate::VelocityCurve;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle count for this preset
    pub fn particle_count(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => COUNT,
            QualityPreset::High => 2000,
        }
    }
}

/// Which way particles travel along z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TravelDirection {
    /// z decreases; recycle below -z/2 back to +z/2
    #[default]
    Toward,
    /// z increases; recycle above +z/2 back to -z/2
    Away,
}

impl TravelDirection {
    /// Sign applied to the per-frame step
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            TravelDirection::Toward => -1.0,
            TravelDirection::Away => 1.0,
        }
    }
}

/// Thresholds for the warp phase gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Settle once the signal falls to this level
    pub velocity_floor: f32,
    /// Enable bloom early once the signal falls to this level
    pub velocity_ceiling: f32,
    /// Signal evaluated from elapsed time
    pub curve: VelocityCurve,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            velocity_floor: VELOCITY_FLOOR,
            velocity_ceiling: VELOCITY_CEILING,
            curve: VelocityCurve::Decay {
                scale: VELOCITY_SCALE,
            },
        }
    }
}

/// Warp engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Number of particles
    pub count: usize,
    /// XY spawn extent
    pub xy_bounds: f32,
    /// Z travel extent
    pub z_bounds: f32,
    /// Per-frame travel ceiling as a multiple of delta
    pub max_speed_factor: f32,
    /// Stretch ceiling
    pub max_scale_factor: f32,
    /// Distortion offset at full intensity
    pub base_offset: f32,

    // === Variants ===
    /// Travel direction along z
    pub direction: TravelDirection,
    /// Re-scatter x/y when a particle is recycled
    pub scatter_on_recycle: bool,
    /// What drives the distortion offset
    pub distortion: DistortionSource,
    /// Optional threshold gate (bloom + stretch cut-off)
    pub gate: Option<GateConfig>,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            count: COUNT,
            xy_bounds: XY_BOUNDS,
            z_bounds: Z_BOUNDS,
            max_speed_factor: MAX_SPEED_FACTOR,
            max_scale_factor: MAX_SCALE_FACTOR,
            base_offset: BASE_OFFSET,

            direction: TravelDirection::Toward,
            scatter_on_recycle: false,
            distortion: DistortionSource::Decay,
            gate: None,
        }
    }
}

impl WarpConfig {
    /// Create a config from a quality preset (applies preset particle count)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            count: preset.particle_count(),
            ..Self::default()
        }
    }

    /// Threshold-gated variant with default thresholds
    pub fn gated() -> Self {
        Self {
            gate: Some(GateConfig::default()),
            ..Self::default()
        }
    }

    /// Half the z extent; the recycle planes sit at ±this
    #[inline]
    pub fn z_half(&self) -> f32 {
        self.z_bounds / 2.0
    }

    /// Half the xy extent
    #[inline]
    pub fn xy_half(&self) -> f32 {
        self.xy_bounds / 2.0
    }

    /// Check every tunable; returns the first violation
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(invalid("count must be positive"));
        }
        if !self.z_bounds.is_finite() || self.z_bounds <= 0.0 {
            return Err(invalid(format!("z_bounds must be positive, got {}", self.z_bounds)));
        }
        if !self.xy_bounds.is_finite() || self.xy_bounds < 0.0 {
            return Err(invalid(format!(
                "xy_bounds must be non-negative, got {}",
                self.xy_bounds
            )));
        }
        // Both factors are clamp ceilings over a floor of 1 (or delta)
        if !self.max_speed_factor.is_finite() || self.max_speed_factor < 1.0 {
            return Err(invalid(format!(
                "max_speed_factor must be >= 1, got {}",
                self.max_speed_factor
            )));
        }
        if !self.max_scale_factor.is_finite() || self.max_scale_factor < 1.0 {
            return Err(invalid(format!(
                "max_scale_factor must be >= 1, got {}",
                self.max_scale_factor
            )));
        }
        if !self.base_offset.is_finite() || self.base_offset < 0.0 {
            return Err(invalid(format!(
                "base_offset must be non-negative, got {}",
                self.base_offset
            )));
        }
        if let Some(gate) = &self.gate {
            if !gate.velocity_floor.is_finite() || !gate.velocity_ceiling.is_finite() {
                return Err(invalid("gate thresholds must be finite"));
            }
            if gate.velocity_floor >= gate.velocity_ceiling {
                return Err(invalid(format!(
                    "velocity_floor ({}) must be below velocity_ceiling ({})",
                    gate.velocity_floor, gate.velocity_ceiling
                )));
            }
            gate.curve.validate()?;
        } else if self.distortion == DistortionSource::Phase {
            return Err(invalid("Phase distortion requires a gate"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load config from a JSON file, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Rejected config {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Could not read {}: {}", path.display(), e),
        }

        log::info!("Using default config");
        Self::default()
    }
}

fn invalid(msg: impl Into<String>) -> WarpError {
    WarpError::InvalidConfiguration(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(WarpConfig::default().validate().is_ok());
        assert!(WarpConfig::gated().validate().is_ok());
    }

    #[test]
    fn test_preset_counts() {
        assert_eq!(WarpConfig::from_preset(QualityPreset::Low).count, 200);
        assert_eq!(WarpConfig::from_preset(QualityPreset::High).count, 2000);
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_count = WarpConfig {
            count: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_count.validate(),
            Err(WarpError::InvalidConfiguration(_))
        ));

        let flat = WarpConfig {
            z_bounds: 0.0,
            ..Default::default()
        };
        assert!(flat.validate().is_err());

        let slow = WarpConfig {
            max_speed_factor: 0.5,
            ..Default::default()
        };
        assert!(slow.validate().is_err());

        let inverted_gate = WarpConfig {
            gate: Some(GateConfig {
                velocity_floor: 5.0,
                velocity_ceiling: 2.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(inverted_gate.validate().is_err());

        let ungated_phase = WarpConfig {
            distortion: DistortionSource::Phase,
            ..Default::default()
        };
        assert!(ungated_phase.validate().is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = WarpConfig::from_json(r#"{ "count": 12, "direction": "Away" }"#).unwrap();
        assert_eq!(config.count, 12);
        assert_eq!(config.direction, TravelDirection::Away);
        assert_eq!(config.z_bounds, Z_BOUNDS);
    }

    #[test]
    fn test_json_rejects_invalid() {
        assert!(matches!(
            WarpConfig::from_json(r#"{ "z_bounds": -1.0 }"#),
            Err(WarpError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            WarpConfig::from_json("{ not json"),
            Err(WarpError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_gated() {
        let config = WarpConfig::gated();
        let json = config.to_json().unwrap();
        assert_eq!(WarpConfig::from_json(&json).unwrap(), config);
    }
}
