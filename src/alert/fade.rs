//! Linear alpha fade

use crate::smoothing::lerp;
use crate::timed::TimedOp;

/// Which way a fade is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

impl FadeDirection {
    fn target(&self) -> f32 {
        match self {
            FadeDirection::In => 1.0,
            FadeDirection::Out => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FadeRun {
    direction: FadeDirection,
    from: f32,
}

/// Alpha fade with independent in/out durations.
///
/// A new fade starts from the current alpha and replaces any fade in flight,
/// so reversing mid-way never pops. Durations scale with the remaining
/// distance, keeping the fade rate constant.
#[derive(Debug, Clone)]
pub struct Fade {
    op: TimedOp<FadeRun>,
    alpha: f32,
    fade_in_seconds: f32,
    fade_out_seconds: f32,
}

impl Fade {
    pub fn new(fade_in_seconds: f32, fade_out_seconds: f32) -> Self {
        Self {
            op: TimedOp::new(),
            alpha: 0.0,
            fade_in_seconds: fade_in_seconds.max(0.0),
            fade_out_seconds: fade_out_seconds.max(0.0),
        }
    }

    pub fn fade_in(&mut self) {
        let duration = self.fade_in_seconds * (1.0 - self.alpha);
        self.start(FadeDirection::In, duration);
    }

    pub fn fade_out(&mut self) {
        let duration = self.fade_out_seconds * self.alpha;
        self.start(FadeDirection::Out, duration);
    }

    fn start(&mut self, direction: FadeDirection, duration: f32) {
        self.op.start(
            FadeRun {
                direction,
                from: self.alpha,
            },
            duration,
        );
        self.sync_alpha();
    }

    /// Advance the fade; returns the direction of a fade this call finished
    pub fn advance(&mut self, dt: f32) -> Option<FadeDirection> {
        match self.op.advance(dt) {
            Some(done) => {
                self.alpha = done.direction.target();
                Some(done.direction)
            }
            None => {
                self.sync_alpha();
                None
            }
        }
    }

    fn sync_alpha(&mut self) {
        if let Some(run) = self.op.kind() {
            self.alpha = lerp(run.from, run.direction.target(), self.op.progress()).clamp(0.0, 1.0);
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Direction of the fade in flight, if any
    pub fn direction(&self) -> Option<FadeDirection> {
        self.op.kind().map(|run| run.direction)
    }

    pub fn is_fading_out(&self) -> bool {
        self.direction() == Some(FadeDirection::Out)
    }
}
