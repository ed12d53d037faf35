//! Simulation settings
//!
//! Every tuning constant the simulation reads, serializable so a host can
//! ship its own JSON. Missing fields fall back to `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub terrain_width: usize,
    pub terrain_height: usize,
    /// Seed for the world RNG (debris scatter, terrain noise)
    pub seed: u64,

    // === Integration ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Sub-steps per frame; each uses the full frame dt
    pub sub_steps: u32,
    /// Number of probe rays over the leading hemisphere
    pub probe_count: u32,
    /// Angular spread of the probe sweep (radians)
    pub probe_spread: f32,
    /// Speed below which a bouncing body freezes
    pub rest_speed: f32,

    // === Explosions ===
    pub debris_per_radius: f32,
    pub impulse_floor: f32,
    pub missile_blast_radius: f32,

    // === Terrain noise ===
    pub noise_octaves: u32,
    pub noise_base_drop: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            terrain_width: TERRAIN_WIDTH,
            terrain_height: TERRAIN_HEIGHT,
            seed: 0,

            gravity: GRAVITY,
            sub_steps: SUB_STEPS,
            probe_count: PROBE_COUNT,
            probe_spread: PROBE_SPREAD,
            rest_speed: REST_SPEED,

            debris_per_radius: DEBRIS_PER_RADIUS,
            impulse_floor: IMPULSE_FLOOR,
            missile_blast_radius: MISSILE_BLAST_RADIUS,

            noise_octaves: NOISE_OCTAVES,
            noise_base_drop: NOISE_BASE_DROP,
        }
    }
}

impl Settings {
    /// Default settings with a specific world seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: terrain {}x{}, {} sub-steps",
            settings.terrain_width,
            settings.terrain_height,
            settings.sub_steps
        );
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject parameter combinations the simulation can't run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.terrain_width == 0 || self.terrain_height == 0 {
            return Err(SimError::InvalidDimensions {
                width: self.terrain_width,
                height: self.terrain_height,
            });
        }
        if self.sub_steps == 0 {
            return Err(SimError::InvalidSettings("sub_steps must be at least 1".into()));
        }
        if self.probe_count == 0 {
            return Err(SimError::InvalidSettings("probe_count must be at least 1".into()));
        }
        if self.noise_octaves == 0 {
            return Err(SimError::InvalidSettings("noise_octaves must be at least 1".into()));
        }
        if self.noise_base_drop == 0.0 || !self.noise_base_drop.is_finite() {
            return Err(SimError::InvalidSettings(format!(
                "noise_base_drop must be finite and non-zero, got {}",
                self.noise_base_drop
            )));
        }
        let non_negative = [
            ("gravity", self.gravity),
            ("probe_spread", self.probe_spread),
            ("rest_speed", self.rest_speed),
            ("debris_per_radius", self.debris_per_radius),
            ("missile_blast_radius", self.missile_blast_radius),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SimError::InvalidSettings(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.impulse_floor > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "impulse_floor must be positive, got {}",
                self.impulse_floor
            )));
        }
        Ok(())
    }
}
