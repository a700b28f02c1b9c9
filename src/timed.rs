//! Fixed-duration timed operations
//!
//! A `TimedOp` is one logical operation slot (a fade, a pulse, a banner) advanced
//! incrementally by whichever cadence owns it. Starting the slot again replaces
//! whatever was in flight: last writer wins.

use serde::{Deserialize, Serialize};

use crate::valid_dt;

/// State of a single operation slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OpState<K> {
    /// Nothing running
    Idle,
    /// Running for `duration` seconds, `elapsed` so far
    Running { elapsed: f32, duration: f32, kind: K },
}

/// A cancel-and-restart timed operation slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedOp<K> {
    state: OpState<K>,
}

impl<K> Default for TimedOp<K> {
    fn default() -> Self {
        Self {
            state: OpState::Idle,
        }
    }
}

impl<K: Copy> TimedOp<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the operation, superseding any in-flight instance
    pub fn start(&mut self, kind: K, duration: f32) {
        self.state = OpState::Running {
            elapsed: 0.0,
            duration: duration.max(0.0),
            kind,
        };
    }

    /// Drop the in-flight instance without completing it
    pub fn cancel(&mut self) {
        self.state = OpState::Idle;
    }

    /// Advance by `dt`. Returns the kind when this call completes the operation.
    ///
    /// Zero-length operations complete on the first advance, even with `dt == 0`.
    pub fn advance(&mut self, dt: f32) -> Option<K> {
        let OpState::Running {
            elapsed,
            duration,
            kind,
        } = self.state
        else {
            return None;
        };

        let step = if valid_dt(dt) { dt } else { 0.0 };
        let elapsed = elapsed + step;
        if elapsed >= duration {
            self.state = OpState::Idle;
            return Some(kind);
        }
        self.state = OpState::Running {
            elapsed,
            duration,
            kind,
        };
        None
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, OpState::Running { .. })
    }

    /// Kind of the in-flight instance, if any
    pub fn kind(&self) -> Option<K> {
        match self.state {
            OpState::Running { kind, .. } => Some(kind),
            OpState::Idle => None,
        }
    }

    /// Normalized progress in [0, 1]; 0 when idle
    pub fn progress(&self) -> f32 {
        match self.state {
            OpState::Running {
                elapsed, duration, ..
            } if duration > 0.0 => (elapsed / duration).clamp(0.0, 1.0),
            OpState::Running { .. } => 1.0,
            OpState::Idle => 0.0,
        }
    }

    pub fn state(&self) -> OpState<K> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_to_completion_once() {
        let mut op = TimedOp::new();
        op.start('a', 1.0);
        assert!(op.is_running());
        assert_eq!(op.advance(0.4), None);
        assert!((op.progress() - 0.4).abs() < 1e-6);
        assert_eq!(op.advance(0.4), None);
        assert_eq!(op.advance(0.4), Some('a'));
        assert!(!op.is_running());
        assert_eq!(op.advance(0.4), None);
    }

    #[test]
    fn test_restart_supersedes_in_flight() {
        let mut op = TimedOp::new();
        op.start(1u8, 1.0);
        op.advance(0.9);
        op.start(2u8, 1.0);
        assert_eq!(op.kind(), Some(2));
        // The first instance would have finished here; the restart must not
        assert_eq!(op.advance(0.2), None);
        assert_eq!(op.advance(0.8), Some(2));
    }

    #[test]
    fn test_invalid_dt_does_not_advance() {
        let mut op = TimedOp::new();
        op.start((), 1.0);
        assert_eq!(op.advance(-5.0), None);
        assert_eq!(op.advance(f32::NAN), None);
        assert_eq!(op.progress(), 0.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut op = TimedOp::new();
        op.start((), 0.0);
        assert_eq!(op.progress(), 1.0);
        assert_eq!(op.advance(0.0), Some(()));
    }

    #[test]
    fn test_cancel() {
        let mut op = TimedOp::new();
        op.start((), 1.0);
        op.cancel();
        assert_eq!(op.state(), OpState::Idle);
        assert_eq!(op.advance(2.0), None);
    }
}
