//! Simulation state and activity types
//!
//! Everything the simulator mutates lives in `SimulationState`.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::consts::EPISODE_FLOOR_SECONDS;
use crate::settings::SimulatorSettings;

/// Current activity episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActivityState {
    #[default]
    Rest,
    Walk,
    Run,
    /// Cool-down after exertion
    Recover,
}

impl ActivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityState::Rest => "Rest",
            ActivityState::Walk => "Walk",
            ActivityState::Run => "Run",
            ActivityState::Recover => "Recover",
        }
    }

    /// Heart target above baseline (bpm)
    pub fn heart_offset(&self, settings: &SimulatorSettings) -> f32 {
        match self {
            ActivityState::Rest => 0.0,
            ActivityState::Walk => settings.walk_offset_bpm,
            ActivityState::Run => settings.run_offset_bpm,
            ActivityState::Recover => settings.walk_offset_bpm * settings.recover_fraction,
        }
    }

    /// Step cadence (steps/s)
    pub fn cadence(&self, settings: &SimulatorSettings) -> f32 {
        let cadence = match self {
            ActivityState::Rest => settings.rest_cadence,
            ActivityState::Walk => settings.walk_cadence,
            ActivityState::Run => settings.run_cadence,
            ActivityState::Recover => settings.walk_cadence * settings.recover_fraction,
        };
        cadence.max(0.0)
    }
}

/// Three-band heart-rate category for visual emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartBand {
    Low,
    Mid,
    High,
}

impl HeartBand {
    /// Classify `bpm` against two thresholds; their order doesn't matter
    pub fn classify(bpm: f32, low_bpm: f32, high_bpm: f32) -> Self {
        let (lo, hi) = (low_bpm.min(high_bpm), low_bpm.max(high_bpm));
        if bpm < lo {
            HeartBand::Low
        } else if bpm < hi {
            HeartBand::Mid
        } else {
            HeartBand::High
        }
    }
}

/// Biometric state for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Always within [heart_min, heart_max]
    pub heart_rate: f32,
    /// Never decreases during a run
    pub steps: u64,
    /// Fractional step carry in [0, 1)
    pub step_accumulator: f32,
    pub activity: ActivityState,
    /// Time spent in the current episode
    pub state_elapsed: f32,
    /// Length of the current episode
    pub state_duration: f32,
}

impl SimulationState {
    /// Fresh run: resting, zero steps, heart at the clamped baseline
    pub fn new(settings: &SimulatorSettings, rng: &mut impl RandomSource) -> Self {
        Self {
            heart_rate: settings.clamped_baseline(),
            steps: 0,
            step_accumulator: 0.0,
            activity: ActivityState::Rest,
            state_elapsed: 0.0,
            state_duration: draw_episode_duration(settings, rng),
        }
    }
}

/// Uniform episode length from the configured range, floored
pub fn draw_episode_duration(settings: &SimulatorSettings, rng: &mut impl RandomSource) -> f32 {
    let min = settings.episode_min_seconds.max(EPISODE_FLOOR_SECONDS);
    let max = settings.episode_max_seconds.max(min);
    rng.range(min, max)
}
