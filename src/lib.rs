//! BioHUD - head-locked biometric heads-up display controllers
//!
//! Core modules:
//! - `sim`: Activity-based biometric simulator (heart rate, steps)
//! - `alert`: Single-slot alert arbitration with priority lock and fades
//! - `stabilizer`: Dead-zone head-lock placement of the HUD anchor
//! - `hud`: Presentation driver wiring the controllers to frame/tick cadences
//! - `settings`: Data-driven tuning for all of the above

pub mod alert;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod smoothing;
pub mod stabilizer;
pub mod timed;

pub use alert::{AlertController, AlertType, AlertView, ClearHold};
pub use hud::{HudDriver, HudFrame};
pub use settings::{HudSettings, SettingsError};
pub use sim::{ActivitySimulator, ActivityState, HeartBand, SimulationState};
pub use stabilizer::{HeadLockStabilizer, HudPlacement, Pose, RotationMode};

/// Runtime constants
pub mod consts {
    /// Default simulation tick rate (Hz). Biometrics don't need render rate.
    pub const DEFAULT_TICK_HZ: f32 = 10.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fastest tick rate the accumulator can sustain without dropping backlog
    pub const MAX_TICK_HZ: f32 = MAX_SUBSTEPS as f32 / MAX_FRAME_DT;

    /// Shortest episode the simulator will ever draw (seconds)
    pub const EPISODE_FLOOR_SECONDS: f32 = 5.0;
    /// Dead zones narrower than this are widened to it (degrees)
    pub const DEAD_ZONE_FLOOR_DEGREES: f32 = 0.1;

    /// Step cadence jitter band applied every tick
    pub const CADENCE_JITTER_MIN: f32 = 0.9;
    pub const CADENCE_JITTER_MAX: f32 = 1.1;
    /// Cap on the fractional step increment of a single tick
    pub const MAX_STEP_INCREMENT: f32 = 1.0e9;
}

/// True for a usable timestep: positive and finite
#[inline]
pub fn valid_dt(dt: f32) -> bool {
    dt > 0.0 && dt.is_finite()
}
