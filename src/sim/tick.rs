//! Simulation tick
//!
//! Advances heart rate and step count by a caller-supplied timestep using the
//! episodic activity model, or the direct-noise model when episodes are off.

use rand_pcg::Pcg32;

use super::random::{RandomSource, seeded_rng};
use super::state::{ActivityState, SimulationState, draw_episode_duration};
use crate::consts::{CADENCE_JITTER_MAX, CADENCE_JITTER_MIN, MAX_STEP_INCREMENT};
use crate::settings::SimulatorSettings;
use crate::smoothing::approach;
use crate::valid_dt;

/// Roll the transition out of a finished episode
pub fn next_activity(
    current: ActivityState,
    settings: &SimulatorSettings,
    rng: &mut impl RandomSource,
) -> ActivityState {
    match current {
        ActivityState::Rest => {
            if rng.chance(settings.escalate_probability) {
                if rng.chance(settings.rest_run_jump_probability) {
                    ActivityState::Run
                } else {
                    ActivityState::Walk
                }
            } else {
                ActivityState::Rest
            }
        }
        ActivityState::Walk => {
            if rng.chance(settings.escalate_probability) {
                ActivityState::Run
            } else if rng.chance(settings.deescalate_probability) {
                ActivityState::Rest
            } else {
                ActivityState::Recover
            }
        }
        ActivityState::Run => {
            if rng.chance(settings.run_recover_probability) {
                ActivityState::Recover
            } else {
                ActivityState::Walk
            }
        }
        ActivityState::Recover => {
            if rng.chance(settings.recover_rest_probability) {
                ActivityState::Rest
            } else {
                ActivityState::Walk
            }
        }
    }
}

/// Advance the simulation state by `dt` seconds. Non-positive `dt` is a no-op.
pub fn tick(
    state: &mut SimulationState,
    settings: &SimulatorSettings,
    rng: &mut impl RandomSource,
    dt: f32,
) {
    if !valid_dt(dt) {
        return;
    }

    let (heart_offset, cadence) = if settings.episodic {
        advance_episode(state, settings, rng, dt);
        (
            state.activity.heart_offset(settings),
            state.activity.cadence(settings),
        )
    } else {
        (0.0, settings.direct_cadence.max(0.0))
    };

    // Heart rate: chase a noisy state target, never jump
    let (heart_min, heart_max) = settings.heart_bounds();
    let target = (settings.heart_baseline + heart_offset + rng.symmetric(settings.heart_noise_bpm))
        .clamp(heart_min, heart_max);
    state.heart_rate = approach(state.heart_rate, target, settings.heart_responsiveness, dt)
        .clamp(heart_min, heart_max);

    // Steps: fractional carry, only whole steps reach the counter
    let jitter = rng.range(CADENCE_JITTER_MIN, CADENCE_JITTER_MAX);
    let increment = cadence * dt * jitter;
    let increment = if increment.is_nan() { 0.0 } else { increment.clamp(0.0, MAX_STEP_INCREMENT) };
    state.step_accumulator += increment;
    let whole = state.step_accumulator.floor();
    if whole >= 1.0 {
        state.steps = state.steps.saturating_add(whole as u64);
        state.step_accumulator -= whole;
    }
}

/// Episode timer; rolls a transition when the current episode runs out
fn advance_episode(
    state: &mut SimulationState,
    settings: &SimulatorSettings,
    rng: &mut impl RandomSource,
    dt: f32,
) {
    state.state_elapsed += dt;
    if state.state_elapsed < state.state_duration {
        return;
    }

    state.state_elapsed = 0.0;
    state.state_duration = draw_episode_duration(settings, rng);
    let next = next_activity(state.activity, settings, rng);
    if next != state.activity {
        log::debug!(
            "Activity {} -> {} for {:.1}s",
            state.activity.as_str(),
            next.as_str(),
            state.state_duration
        );
    }
    state.activity = next;
}

/// Owns the simulation state, its tuning, and its random source
#[derive(Debug, Clone)]
pub struct ActivitySimulator<R: RandomSource = Pcg32> {
    settings: SimulatorSettings,
    state: SimulationState,
    rng: R,
}

impl ActivitySimulator<Pcg32> {
    /// Seeded simulator (same seed, same trajectory)
    pub fn new(settings: &SimulatorSettings, seed: u64) -> Self {
        Self::with_rng(settings, seeded_rng(seed))
    }
}

impl<R: RandomSource> ActivitySimulator<R> {
    /// Simulator drawing from an injected random source
    pub fn with_rng(settings: &SimulatorSettings, mut rng: R) -> Self {
        let settings = settings.normalized();
        let state = SimulationState::new(&settings, &mut rng);
        Self {
            settings,
            state,
            rng,
        }
    }

    /// Advance by `dt` seconds of simulated time
    pub fn tick(&mut self, dt: f32) {
        tick(&mut self.state, &self.settings, &mut self.rng, dt);
    }

    /// Start a new run: resting, zero steps, heart at baseline
    pub fn reset(&mut self) {
        self.state = SimulationState::new(&self.settings, &mut self.rng);
        log::info!("Simulation reset");
    }

    /// Jump to `activity` with a freshly drawn episode length
    pub fn force_activity(&mut self, activity: ActivityState) {
        self.state.activity = activity;
        self.state.state_elapsed = 0.0;
        self.state.state_duration = draw_episode_duration(&self.settings, &mut self.rng);
    }

    pub fn heart_rate(&self) -> f32 {
        self.state.heart_rate
    }

    pub fn steps(&self) -> u64 {
        self.state.steps
    }

    pub fn activity(&self) -> ActivityState {
        self.state.activity
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }
}
