//! Single-slot alert controller
//!
//! Holds at most one active alert. Higher-priority alerts pre-empt lower ones;
//! with the priority lock on, lower ones can't pre-empt higher ones. Clearing
//! fades the panel out before the slot is released.

use serde::{Deserialize, Serialize};

use super::fade::{Fade, FadeDirection};
use crate::settings::AlertSettings;

/// Alert categories, ordered by priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum AlertType {
    #[default]
    None,
    Sedentary,
    HeartHigh,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::None => "None",
            AlertType::Sedentary => "Sedentary",
            AlertType::HeartHigh => "HeartHigh",
        }
    }
}

/// Snapshot of the alert panel for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub kind: AlertType,
    pub message: String,
    pub alpha: f32,
    pub visible: bool,
}

/// How the panel's visibility is driven
#[derive(Debug, Clone)]
enum Visibility {
    /// Fade-managed: alpha animates, the slot frees when the fade-out ends
    Faded(Fade),
    /// Fallback without fade support: visibility flips immediately
    Toggle { visible: bool },
}

/// Arbitrates competing alert conditions into one coherent message
#[derive(Debug, Clone)]
pub struct AlertController {
    priority_lock: bool,
    active: AlertType,
    message: String,
    visibility: Visibility,
}

impl AlertController {
    /// Controller using fades when the settings enable them
    pub fn new(settings: &AlertSettings) -> Self {
        if settings.fade_enabled {
            let settings = settings.normalized();
            Self::with_visibility(
                settings.priority_lock,
                Visibility::Faded(Fade::new(settings.fade_in_seconds, settings.fade_out_seconds)),
            )
        } else {
            Self::without_fade(settings)
        }
    }

    /// Controller that toggles visibility directly (no fade support)
    pub fn without_fade(settings: &AlertSettings) -> Self {
        Self::with_visibility(settings.priority_lock, Visibility::Toggle { visible: false })
    }

    fn with_visibility(priority_lock: bool, visibility: Visibility) -> Self {
        Self {
            priority_lock,
            active: AlertType::None,
            message: String::new(),
            visibility,
        }
    }

    /// Activate `kind` with `message`.
    ///
    /// Returns false for `AlertType::None`, or when the priority lock is on and
    /// a strictly higher-priority alert is active. Showing the alert that is
    /// already up only refreshes its text.
    pub fn show(&mut self, kind: AlertType, message: impl Into<String>) -> bool {
        if kind == AlertType::None {
            log::warn!("Ignoring show request for AlertType::None");
            return false;
        }
        if self.priority_lock && self.active > kind {
            log::debug!(
                "Alert {} rejected: {} is active",
                kind.as_str(),
                self.active.as_str()
            );
            return false;
        }

        self.message = message.into();
        if kind == self.active && !self.is_clearing() {
            return true;
        }

        if self.active != kind {
            log::info!("Alert {} -> {}", self.active.as_str(), kind.as_str());
        }
        self.active = kind;
        match &mut self.visibility {
            Visibility::Faded(fade) => fade.fade_in(),
            Visibility::Toggle { visible } => *visible = true,
        }
        true
    }

    /// Replace the text of `kind` if it is the active alert; never changes the type
    pub fn update_if_current(&mut self, kind: AlertType, message: impl Into<String>) {
        if kind != AlertType::None && kind == self.active {
            self.message = message.into();
        }
    }

    /// Start clearing `kind` if it is the active alert.
    ///
    /// With fades the slot is released when the fade-out completes; returns
    /// true if this call started (or finished) a clear.
    pub fn clear(&mut self, kind: AlertType) -> bool {
        if kind == AlertType::None || kind != self.active {
            return false;
        }
        match &mut self.visibility {
            Visibility::Faded(fade) => {
                if fade.is_fading_out() {
                    return false;
                }
                log::info!("Alert {} clearing", kind.as_str());
                fade.fade_out();
                // Zero-length fade-outs release the slot right away
                self.advance(0.0);
            }
            Visibility::Toggle { visible } => {
                *visible = false;
                self.release();
            }
        }
        true
    }

    /// Render-cadence update of the fade
    pub fn advance(&mut self, dt: f32) {
        if let Visibility::Faded(fade) = &mut self.visibility {
            if fade.advance(dt) == Some(FadeDirection::Out) {
                self.release();
            }
        }
    }

    fn release(&mut self) {
        log::info!("Alert {} cleared", self.active.as_str());
        self.active = AlertType::None;
        self.message.clear();
    }

    pub fn current_type(&self) -> AlertType {
        self.active
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// A clear is in progress (the type stays active until it finishes)
    pub fn is_clearing(&self) -> bool {
        match &self.visibility {
            Visibility::Faded(fade) => fade.is_fading_out(),
            Visibility::Toggle { .. } => false,
        }
    }

    pub fn alpha(&self) -> f32 {
        match &self.visibility {
            Visibility::Faded(fade) => fade.alpha(),
            Visibility::Toggle { visible } => {
                if *visible {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        match &self.visibility {
            Visibility::Faded(fade) => fade.alpha() > 0.0,
            Visibility::Toggle { visible } => *visible,
        }
    }

    pub fn uses_fade(&self) -> bool {
        matches!(self.visibility, Visibility::Faded(_))
    }

    pub fn view(&self) -> AlertView {
        AlertView {
            kind: self.active,
            message: self.message.clone(),
            alpha: self.alpha(),
            visible: self.is_visible(),
        }
    }
}
