//! Alert arbitration
//!
//! One alert slot, shown one message at a time:
//! - `controller`: show/update/clear with priority lock
//! - `fade`: linear alpha fades gating the slot's transitions
//! - `hysteresis`: hold timer that debounces auto-clear

pub mod controller;
pub mod fade;
pub mod hysteresis;

pub use controller::{AlertController, AlertType, AlertView};
pub use fade::{Fade, FadeDirection};
pub use hysteresis::ClearHold;
