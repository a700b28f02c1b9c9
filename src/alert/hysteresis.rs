//! Clear hysteresis
//!
//! An active alert only auto-clears after its safe condition has held for the
//! whole hold duration. Any unsafe sample restarts the wait.

use crate::valid_dt;

/// Continuous-safe hold timer
#[derive(Debug, Clone, PartialEq)]
pub struct ClearHold {
    hold_seconds: f32,
    /// Time the safe condition has held so far; None while unsafe
    safe_elapsed: Option<f32>,
}

impl ClearHold {
    pub fn new(hold_seconds: f32) -> Self {
        Self {
            hold_seconds: hold_seconds.max(0.0),
            safe_elapsed: None,
        }
    }

    /// Feed one sample. Returns true once `safe` has held for the hold duration.
    pub fn observe(&mut self, safe: bool, dt: f32) -> bool {
        if !safe {
            self.safe_elapsed = None;
            return false;
        }
        let step = if valid_dt(dt) { dt } else { 0.0 };
        let elapsed = self.safe_elapsed.unwrap_or(0.0) + step;
        self.safe_elapsed = Some(elapsed);
        elapsed >= self.hold_seconds
    }

    /// Cancel any hold in progress
    pub fn reset(&mut self) {
        self.safe_elapsed = None;
    }

    pub fn is_holding(&self) -> bool {
        self.safe_elapsed.is_some()
    }

    pub fn elapsed(&self) -> f32 {
        self.safe_elapsed.unwrap_or(0.0)
    }

    pub fn hold_seconds(&self) -> f32 {
        self.hold_seconds
    }
}
