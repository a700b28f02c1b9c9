//! HUD tuning and preferences
//!
//! Every knob the controllers read lives here. Loaded from JSON; missing
//! fields fall back to defaults and malformed values are normalized rather
//! than rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEAD_ZONE_FLOOR_DEGREES, DEFAULT_TICK_HZ, EPISODE_FLOOR_SECONDS, MAX_TICK_HZ};

/// Settings loading failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Biometric simulator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Resting heart rate the states offset from (bpm)
    pub heart_baseline: f32,
    pub heart_min: f32,
    pub heart_max: f32,
    /// Uniform target noise, ± this many bpm per tick
    pub heart_noise_bpm: f32,
    /// Exponential catch-up rate toward the target (1/s)
    pub heart_responsiveness: f32,

    // === Per-state targets ===
    pub walk_offset_bpm: f32,
    pub run_offset_bpm: f32,
    /// Recover offset and cadence as a fraction of Walk's
    pub recover_fraction: f32,

    // === Per-state cadence (steps/s) ===
    pub rest_cadence: f32,
    pub walk_cadence: f32,
    pub run_cadence: f32,

    // === Episodes ===
    pub episode_min_seconds: f32,
    pub episode_max_seconds: f32,
    pub escalate_probability: f32,
    pub deescalate_probability: f32,
    /// Chance a Rest escalation skips Walk and goes straight to Run
    pub rest_run_jump_probability: f32,
    pub run_recover_probability: f32,
    pub recover_rest_probability: f32,

    /// Use the episodic model; false selects the direct-noise model
    pub episodic: bool,
    /// Cadence used by the direct-noise model (steps/s)
    pub direct_cadence: f32,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            heart_baseline: 72.0,
            heart_min: 58.0,
            heart_max: 165.0,
            heart_noise_bpm: 3.0,
            heart_responsiveness: 0.35,

            walk_offset_bpm: 28.0,
            run_offset_bpm: 70.0,
            recover_fraction: 0.5,

            rest_cadence: 0.05,
            walk_cadence: 1.8,
            run_cadence: 2.8,

            episode_min_seconds: 20.0,
            episode_max_seconds: 60.0,
            escalate_probability: 0.35,
            deescalate_probability: 0.3,
            rest_run_jump_probability: 0.15,
            run_recover_probability: 0.8,
            recover_rest_probability: 0.6,

            episodic: true,
            direct_cadence: 1.0,
        }
    }
}

/// Alert arbitration and hysteresis tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Reject lower-priority alerts while a higher one is showing
    pub priority_lock: bool,
    /// Fade-managed visibility; false toggles visibility directly
    pub fade_enabled: bool,
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,

    /// Heart-high alert fires at or above this (bpm)
    pub heart_alert_bpm: f32,
    /// Heart rate must be below this to count as safe (bpm)
    pub heart_safe_bpm: f32,
    /// Continuous safe time before a heart-high alert auto-clears (s)
    pub clear_hold_seconds: f32,

    /// Seconds without a new step before the sedentary reminder
    pub sedentary_after_seconds: f32,

    /// `{bpm}` is replaced with the current rounded heart rate
    pub heart_high_message: String,
    pub sedentary_message: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            priority_lock: true,
            fade_enabled: true,
            fade_in_seconds: 0.25,
            fade_out_seconds: 0.4,

            heart_alert_bpm: 140.0,
            heart_safe_bpm: 130.0,
            clear_hold_seconds: 5.0,

            sedentary_after_seconds: 120.0,

            heart_high_message: "Heart rate high: {bpm} bpm".to_string(),
            sedentary_message: "Time to move!".to_string(),
        }
    }
}

/// Output rotation for the HUD transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationMode {
    /// Use the anchor orientation as-is
    #[default]
    Anchor,
    /// Turn the panel to face back toward the viewer
    FaceViewer,
}

/// Dead-zone head-lock tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerSettings {
    /// Drift tolerated before the anchor moves (degrees)
    pub dead_zone_degrees: f32,
    /// Catch-up rate once outside the dead zone (1/s)
    pub recenter_speed: f32,
    /// Catch-up multiplier during fast turns
    pub fast_turn_boost: f32,
    /// Head speed that counts as a fast turn (deg/s)
    pub fast_turn_deg_per_sec: f32,

    // === Camera-space placement (meters) ===
    pub forward_offset: f32,
    pub up_offset: f32,
    pub right_offset: f32,

    pub rotation_mode: RotationMode,
}

impl Default for StabilizerSettings {
    fn default() -> Self {
        Self {
            dead_zone_degrees: 8.0,
            recenter_speed: 4.0,
            fast_turn_boost: 2.5,
            fast_turn_deg_per_sec: 120.0,

            forward_offset: 1.2,
            up_offset: -0.15,
            right_offset: 0.0,

            rotation_mode: RotationMode::Anchor,
        }
    }
}

/// Presentation driver tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    /// Simulation tick rate (Hz)
    pub tick_hz: f32,

    // === Heart color bands (bpm) ===
    pub band_low_bpm: f32,
    pub band_high_bpm: f32,

    // === Goal banner ===
    pub step_goal: u64,
    pub goal_banner_seconds: f32,

    // === Heart icon pulse ===
    pub pulse_interval_seconds: f32,
    pub pulse_seconds: f32,
    /// Peak extra scale at mid-pulse (0.2 = 120%)
    pub pulse_scale: f32,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,

            band_low_bpm: 90.0,
            band_high_bpm: 130.0,

            step_goal: 1000,
            goal_banner_seconds: 4.0,

            pulse_interval_seconds: 1.0,
            pulse_seconds: 0.25,
            pulse_scale: 0.15,
        }
    }
}

/// Complete HUD configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HudSettings {
    pub simulator: SimulatorSettings,
    pub alerts: AlertSettings,
    pub stabilizer: StabilizerSettings,
    pub presentation: PresentationSettings,
}

/// Order a (low, high) pair
fn ordered(a: f32, b: f32) -> (f32, f32) {
    (a.min(b), a.max(b))
}

fn probability(p: f32) -> f32 {
    if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

impl SimulatorSettings {
    /// Repair swapped bounds and out-of-range values
    pub fn normalized(&self) -> Self {
        let mut s = self.clone();
        (s.heart_min, s.heart_max) = ordered(s.heart_min, s.heart_max);
        s.heart_noise_bpm = non_negative(s.heart_noise_bpm);
        s.heart_responsiveness = non_negative(s.heart_responsiveness);
        s.recover_fraction = non_negative(s.recover_fraction);

        s.rest_cadence = non_negative(s.rest_cadence);
        s.walk_cadence = non_negative(s.walk_cadence);
        s.run_cadence = non_negative(s.run_cadence);
        s.direct_cadence = non_negative(s.direct_cadence);

        let (lo, hi) = ordered(s.episode_min_seconds, s.episode_max_seconds);
        s.episode_min_seconds = lo.max(EPISODE_FLOOR_SECONDS);
        s.episode_max_seconds = hi.max(s.episode_min_seconds);

        s.escalate_probability = probability(s.escalate_probability);
        s.deescalate_probability = probability(s.deescalate_probability);
        s.rest_run_jump_probability = probability(s.rest_run_jump_probability);
        s.run_recover_probability = probability(s.run_recover_probability);
        s.recover_rest_probability = probability(s.recover_rest_probability);
        s
    }

    /// Heart bounds in (low, high) order, whatever order they were configured in
    pub fn heart_bounds(&self) -> (f32, f32) {
        let (lo, hi) = ordered(self.heart_min, self.heart_max);
        if lo.is_nan() {
            let defaults = Self::default();
            return (defaults.heart_min, defaults.heart_max);
        }
        (lo, hi)
    }

    /// Baseline clamped into the heart bounds
    pub fn clamped_baseline(&self) -> f32 {
        let (lo, hi) = self.heart_bounds();
        self.heart_baseline.clamp(lo, hi)
    }
}

impl AlertSettings {
    pub fn normalized(&self) -> Self {
        let mut s = self.clone();
        s.fade_in_seconds = non_negative(s.fade_in_seconds);
        s.fade_out_seconds = non_negative(s.fade_out_seconds);
        // Safe threshold sits at or below the alert threshold
        (s.heart_safe_bpm, s.heart_alert_bpm) = ordered(s.heart_safe_bpm, s.heart_alert_bpm);
        s.clear_hold_seconds = non_negative(s.clear_hold_seconds);
        s.sedentary_after_seconds = non_negative(s.sedentary_after_seconds);
        s
    }
}

impl StabilizerSettings {
    pub fn normalized(&self) -> Self {
        let mut s = self.clone();
        s.dead_zone_degrees = non_negative(s.dead_zone_degrees);
        s.recenter_speed = non_negative(s.recenter_speed);
        s.fast_turn_boost = if s.fast_turn_boost.is_finite() {
            s.fast_turn_boost.max(1.0)
        } else {
            1.0
        };
        s.fast_turn_deg_per_sec = non_negative(s.fast_turn_deg_per_sec);
        s
    }

    /// Dead zone with the minimum floor applied
    pub fn effective_dead_zone(&self) -> f32 {
        self.dead_zone_degrees.max(DEAD_ZONE_FLOOR_DEGREES)
    }
}

impl PresentationSettings {
    pub fn normalized(&self) -> Self {
        let mut s = self.clone();
        if !(s.tick_hz.is_finite() && s.tick_hz > 0.0) {
            log::warn!("Invalid tick rate {}, using {}", s.tick_hz, DEFAULT_TICK_HZ);
            s.tick_hz = DEFAULT_TICK_HZ;
        } else if s.tick_hz > MAX_TICK_HZ {
            log::warn!("Tick rate {} exceeds {}, capping", s.tick_hz, MAX_TICK_HZ);
            s.tick_hz = MAX_TICK_HZ;
        }
        (s.band_low_bpm, s.band_high_bpm) = ordered(s.band_low_bpm, s.band_high_bpm);
        s.goal_banner_seconds = non_negative(s.goal_banner_seconds);
        s.pulse_interval_seconds = non_negative(s.pulse_interval_seconds);
        s.pulse_seconds = non_negative(s.pulse_seconds);
        s
    }

    /// Fixed simulation timestep (seconds)
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_hz
    }
}

impl HudSettings {
    /// Parse from a JSON document (partial documents are filled from defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.normalized())
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded HUD settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy with every section normalized
    pub fn normalized(&self) -> Self {
        let normalized = Self {
            simulator: self.simulator.normalized(),
            alerts: self.alerts.normalized(),
            stabilizer: self.stabilizer.normalized(),
            presentation: self.presentation.normalized(),
        };
        if normalized != *self {
            log::warn!("HUD settings contained out-of-range values; normalized");
        }
        normalized
    }
}
