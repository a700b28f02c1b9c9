//! Dead-zone head-lock stabilizer
//!
//! Keeps the HUD anchor still under small head motion and chases large turns
//! with an exponential catch-up, boosted while the head is turning fast.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use crate::settings::RotationMode;
use crate::settings::StabilizerSettings;
use crate::smoothing::{angle_between_degrees, exp_factor, slerp};
use crate::valid_dt;

/// Camera-space basis (right-handed, -Z forward)
const FORWARD: Vec3 = Vec3::NEG_Z;
const UP: Vec3 = Vec3::Y;
const RIGHT: Vec3 = Vec3::X;

/// Tracked viewpoint pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at the origin looking along `orientation`
    pub fn looking(orientation: Quat) -> Self {
        Self::new(Vec3::ZERO, orientation)
    }
}

/// Where to place the HUD transform this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudPlacement {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Anchor state carried between frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilizerState {
    /// Direction the HUD is currently placed relative to
    pub anchor_orientation: Quat,
    /// Previous frame's head orientation, for angular speed
    pub last_view_orientation: Quat,
    pub initialized: bool,
}

impl Default for StabilizerState {
    fn default() -> Self {
        Self {
            anchor_orientation: Quat::IDENTITY,
            last_view_orientation: Quat::IDENTITY,
            initialized: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadLockStabilizer {
    settings: StabilizerSettings,
    state: StabilizerState,
    active: bool,
    /// Last estimated head speed (deg/s)
    angular_speed: f32,
}

impl HeadLockStabilizer {
    pub fn new(settings: &StabilizerSettings) -> Self {
        Self {
            settings: settings.normalized(),
            state: StabilizerState::default(),
            active: true,
            angular_speed: 0.0,
        }
    }

    /// Enable or disable stabilization. Re-enabling re-anchors on the next update.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::info!("Head-lock stabilizer {}", if active { "enabled" } else { "disabled" });
        }
        self.active = active;
        if !active {
            self.state.initialized = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Snap the anchor to the next tracked orientation
    pub fn recenter(&mut self) {
        self.state.initialized = false;
    }

    /// Place the HUD for this frame
    pub fn update(&mut self, tracked: Pose, dt: f32) -> HudPlacement {
        let view = self.usable_orientation(tracked.orientation);

        if !self.active {
            self.angular_speed = 0.0;
            return self.place(tracked.position, view);
        }

        if !self.state.initialized {
            self.state = StabilizerState {
                anchor_orientation: view,
                last_view_orientation: view,
                initialized: true,
            };
            self.angular_speed = 0.0;
            log::debug!("Head-lock anchor initialized");
            return self.place(tracked.position, view);
        }

        self.angular_speed = if valid_dt(dt) {
            angle_between_degrees(self.state.last_view_orientation, view) / dt
        } else {
            0.0
        };
        self.state.last_view_orientation = view;

        let drift = angle_between_degrees(self.state.anchor_orientation, view);
        if drift > self.settings.effective_dead_zone() {
            let mut speed = self.settings.recenter_speed;
            if self.angular_speed >= self.settings.fast_turn_deg_per_sec {
                speed *= self.settings.fast_turn_boost;
            }
            let t = exp_factor(speed, dt);
            self.state.anchor_orientation = slerp(self.state.anchor_orientation, view, t);
        }

        self.place(tracked.position, self.state.anchor_orientation)
    }

    /// Normalized tracked orientation; a degenerate or non-finite sample
    /// repeats the last good one so it never reaches the anchor
    fn usable_orientation(&self, orientation: Quat) -> Quat {
        if orientation.is_finite() && orientation.length_squared() > 1e-12 {
            orientation.normalize()
        } else {
            log::trace!("Ignoring degenerate tracked orientation {orientation:?}");
            self.state.last_view_orientation
        }
    }

    fn place(&self, head_position: Vec3, anchor: Quat) -> HudPlacement {
        let local = FORWARD * self.settings.forward_offset
            + UP * self.settings.up_offset
            + RIGHT * self.settings.right_offset;
        let position = head_position + anchor * local;

        let rotation = match self.settings.rotation_mode {
            RotationMode::Anchor => anchor,
            RotationMode::FaceViewer => face_viewer(position - head_position, anchor * UP)
                .unwrap_or(anchor),
        };
        HudPlacement { position, rotation }
    }

    pub fn anchor_orientation(&self) -> Quat {
        self.state.anchor_orientation
    }

    /// Current angle between the anchor and the last tracked orientation
    pub fn drift_degrees(&self) -> f32 {
        angle_between_degrees(self.state.anchor_orientation, self.state.last_view_orientation)
    }

    pub fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    pub fn state(&self) -> &StabilizerState {
        &self.state
    }
}

/// Rotation whose front face (+Z) points back along `to_panel`, toward the viewer.
/// None when the direction is degenerate or parallel to `up`.
fn face_viewer(to_panel: Vec3, up: Vec3) -> Option<Quat> {
    // The panel's -Z (forward) looks away from the viewer, along to_panel
    let back = (-to_panel).try_normalize()?;
    let right = up.cross(back).try_normalize()?;
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize())
}
