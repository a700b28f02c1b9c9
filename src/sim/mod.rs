//! Biometric simulation module
//!
//! Heart rate and step count come from here. This module must stay
//! deterministic for a given seed:
//! - Caller-supplied timestep only
//! - All randomness through `RandomSource`
//! - No rendering or presentation dependencies

pub mod random;
pub mod state;
pub mod tick;

pub use random::{RandomSource, seeded_rng};
pub use state::{ActivityState, HeartBand, SimulationState};
pub use tick::{ActivitySimulator, next_activity, tick};
