//! Heart icon pulse animation

use std::f32::consts::PI;

use crate::timed::TimedOp;
use crate::valid_dt;

/// Periodic scale pulse. Each trigger restarts the pulse in flight.
#[derive(Debug, Clone)]
pub struct HeartPulse {
    interval: f32,
    duration: f32,
    scale: f32,
    timer: f32,
    op: TimedOp<()>,
}

impl HeartPulse {
    /// A zero interval disables the automatic beat; `trigger` still works
    pub fn new(interval: f32, duration: f32, scale: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            duration: duration.max(0.0),
            scale,
            timer: 0.0,
            op: TimedOp::new(),
        }
    }

    /// Start a pulse now, superseding any pulse in flight
    pub fn trigger(&mut self) {
        self.op.start((), self.duration);
    }

    pub fn advance(&mut self, dt: f32) {
        if !valid_dt(dt) {
            return;
        }
        self.op.advance(dt);
        if self.interval > 0.0 {
            self.timer += dt;
            if self.timer >= self.interval {
                self.timer %= self.interval;
                self.trigger();
            }
        }
    }

    /// Scale multiplier for the icon: 1 at rest, peaking mid-pulse
    pub fn scale_factor(&self) -> f32 {
        if !self.op.is_running() {
            return 1.0;
        }
        1.0 + self.scale * (PI * self.op.progress()).sin()
    }

    pub fn is_pulsing(&self) -> bool {
        self.op.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_on_interval() {
        let mut pulse = HeartPulse::new(1.0, 0.5, 0.2);
        pulse.advance(0.75);
        assert!(!pulse.is_pulsing());
        assert_eq!(pulse.scale_factor(), 1.0);
        pulse.advance(0.25);
        assert!(pulse.is_pulsing());
        pulse.advance(0.25);
        assert!((pulse.scale_factor() - 1.2).abs() < 1e-4);
        pulse.advance(0.25);
        assert!(!pulse.is_pulsing());
    }

    #[test]
    fn test_trigger_restarts_in_flight_pulse() {
        let mut pulse = HeartPulse::new(0.0, 1.0, 0.2);
        pulse.trigger();
        pulse.advance(0.75);
        pulse.trigger();
        pulse.advance(0.5);
        // Halfway through the restarted pulse, not finished from the first
        assert!(pulse.is_pulsing());
        assert!((pulse.scale_factor() - 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_zero_interval_never_auto_beats() {
        let mut pulse = HeartPulse::new(0.0, 0.2, 0.2);
        for _ in 0..100 {
            pulse.advance(0.1);
        }
        assert!(!pulse.is_pulsing());
    }
}
