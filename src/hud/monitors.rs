//! Alert conditions evaluated once per simulation tick
//!
//! Each monitor turns a biometric reading into Show/Clear calls on the alert
//! controller, firing once per qualifying transition rather than once per tick.

use crate::alert::{AlertController, AlertType, ClearHold};
use crate::settings::AlertSettings;

/// Fill `{bpm}` in a message template
pub fn format_heart_message(template: &str, bpm: f32) -> String {
    template.replace("{bpm}", &format!("{}", bpm.round().max(0.0) as u32))
}

/// Heart-high alert with hysteresis on the way down
#[derive(Debug, Clone)]
pub struct HeartAlertMonitor {
    alert_bpm: f32,
    safe_bpm: f32,
    hold: ClearHold,
    template: String,
}

impl HeartAlertMonitor {
    pub fn new(settings: &AlertSettings) -> Self {
        let settings = settings.normalized();
        Self {
            alert_bpm: settings.heart_alert_bpm,
            safe_bpm: settings.heart_safe_bpm,
            hold: ClearHold::new(settings.clear_hold_seconds),
            template: settings.heart_high_message,
        }
    }

    pub fn evaluate(&mut self, alerts: &mut AlertController, bpm: f32, dt: f32) {
        let showing = alerts.current_type() == AlertType::HeartHigh && !alerts.is_clearing();

        if bpm >= self.alert_bpm {
            // A fresh high reading restarts the clear wait
            self.hold.reset();
            let message = format_heart_message(&self.template, bpm);
            if showing {
                alerts.update_if_current(AlertType::HeartHigh, message);
            } else {
                alerts.show(AlertType::HeartHigh, message);
            }
            return;
        }

        if !showing {
            self.hold.reset();
            return;
        }

        alerts.update_if_current(AlertType::HeartHigh, format_heart_message(&self.template, bpm));
        if self.hold.observe(bpm < self.safe_bpm, dt) {
            log::debug!("Heart rate safe for {:.1}s, clearing", self.hold.elapsed());
            alerts.clear(AlertType::HeartHigh);
            self.hold.reset();
        }
    }

    pub fn hold(&self) -> &ClearHold {
        &self.hold
    }
}

/// Reminder after a stretch without new steps
#[derive(Debug, Clone)]
pub struct SedentaryMonitor {
    after_seconds: f32,
    idle_seconds: f32,
    last_steps: u64,
    fired: bool,
    message: String,
}

impl SedentaryMonitor {
    pub fn new(settings: &AlertSettings) -> Self {
        let settings = settings.normalized();
        Self {
            after_seconds: settings.sedentary_after_seconds,
            idle_seconds: 0.0,
            last_steps: 0,
            fired: false,
            message: settings.sedentary_message,
        }
    }

    pub fn evaluate(&mut self, alerts: &mut AlertController, steps: u64, dt: f32) {
        if steps != self.last_steps {
            let moved = steps > self.last_steps;
            self.last_steps = steps;
            self.idle_seconds = 0.0;
            if moved && self.fired {
                self.fired = false;
                alerts.clear(AlertType::Sedentary);
            }
            return;
        }

        self.idle_seconds += dt.max(0.0);
        if !self.fired && self.idle_seconds >= self.after_seconds {
            // Stays armed if a higher-priority alert blocks it
            self.fired = alerts.show(AlertType::Sedentary, self.message.clone());
        }
    }

    pub fn idle_seconds(&self) -> f32 {
        self.idle_seconds
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// One-shot step goal latch
#[derive(Debug, Clone)]
pub struct GoalTracker {
    goal: u64,
    fired: bool,
}

impl GoalTracker {
    pub fn new(goal: u64) -> Self {
        Self { goal, fired: false }
    }

    /// True exactly once, the first time `steps` reaches the goal. A zero goal never fires.
    pub fn check(&mut self, steps: u64) -> bool {
        if self.fired || self.goal == 0 || steps < self.goal {
            return false;
        }
        self.fired = true;
        log::info!("Step goal {} reached", self.goal);
        true
    }

    /// Re-arm the latch
    pub fn reset(&mut self) {
        self.fired = false;
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert_settings() -> AlertSettings {
        AlertSettings {
            heart_alert_bpm: 140.0,
            heart_safe_bpm: 130.0,
            clear_hold_seconds: 5.0,
            fade_in_seconds: 0.0,
            fade_out_seconds: 0.0,
            sedentary_after_seconds: 10.0,
            ..Default::default()
        }
    }

    fn feed(
        monitor: &mut HeartAlertMonitor,
        alerts: &mut AlertController,
        bpm: f32,
        seconds: f32,
        dt: f32,
    ) {
        let ticks = (seconds / dt).round() as usize;
        for _ in 0..ticks {
            monitor.evaluate(alerts, bpm, dt);
        }
    }

    #[test]
    fn test_format_heart_message() {
        assert_eq!(format_heart_message("HR {bpm}!", 141.6), "HR 142!");
        assert_eq!(format_heart_message("no placeholder", 90.0), "no placeholder");
    }

    #[test]
    fn test_heart_alert_shows_and_refreshes() {
        let settings = alert_settings();
        let mut alerts = AlertController::new(&settings);
        let mut monitor = HeartAlertMonitor::new(&settings);

        monitor.evaluate(&mut alerts, 120.0, 0.25);
        assert_eq!(alerts.current_type(), AlertType::None);

        monitor.evaluate(&mut alerts, 145.0, 0.25);
        assert_eq!(alerts.current_type(), AlertType::HeartHigh);
        assert_eq!(alerts.message(), "Heart rate high: 145 bpm");

        monitor.evaluate(&mut alerts, 150.0, 0.25);
        assert_eq!(alerts.message(), "Heart rate high: 150 bpm");
    }

    #[test]
    fn test_momentary_dip_does_not_clear() {
        let settings = alert_settings();
        let mut alerts = AlertController::new(&settings);
        let mut monitor = HeartAlertMonitor::new(&settings);

        monitor.evaluate(&mut alerts, 150.0, 0.25);
        // Dip below safe for 4.75s, then back between the thresholds
        feed(&mut monitor, &mut alerts, 120.0, 4.75, 0.25);
        assert_eq!(alerts.current_type(), AlertType::HeartHigh);
        feed(&mut monitor, &mut alerts, 135.0, 1.0, 0.25);
        assert_eq!(alerts.current_type(), AlertType::HeartHigh);
        assert!(!monitor.hold().is_holding());

        // A new dip must start its own full 5s wait
        feed(&mut monitor, &mut alerts, 120.0, 4.75, 0.25);
        assert_eq!(alerts.current_type(), AlertType::HeartHigh);
        feed(&mut monitor, &mut alerts, 120.0, 0.25, 0.25);
        assert_eq!(alerts.current_type(), AlertType::None);
    }

    #[test]
    fn test_high_reading_restarts_hold() {
        let settings = alert_settings();
        let mut alerts = AlertController::new(&settings);
        let mut monitor = HeartAlertMonitor::new(&settings);

        monitor.evaluate(&mut alerts, 150.0, 0.25);
        feed(&mut monitor, &mut alerts, 120.0, 4.0, 0.25);
        monitor.evaluate(&mut alerts, 141.0, 0.25);
        feed(&mut monitor, &mut alerts, 120.0, 4.75, 0.25);
        assert_eq!(alerts.current_type(), AlertType::HeartHigh);
        feed(&mut monitor, &mut alerts, 120.0, 0.25, 0.25);
        assert_eq!(alerts.current_type(), AlertType::None);
    }

    #[test]
    fn test_sedentary_fires_once_per_idle_stretch() {
        let settings = alert_settings();
        let mut alerts = AlertController::new(&settings);
        let mut monitor = SedentaryMonitor::new(&settings);

        for _ in 0..39 {
            monitor.evaluate(&mut alerts, 0, 0.25);
        }
        assert_eq!(alerts.current_type(), AlertType::None);
        monitor.evaluate(&mut alerts, 0, 0.25);
        assert_eq!(alerts.current_type(), AlertType::Sedentary);
        assert!(monitor.has_fired());

        // Dismissed externally; still idle, must not re-fire
        alerts.clear(AlertType::Sedentary);
        for _ in 0..100 {
            monitor.evaluate(&mut alerts, 0, 0.25);
        }
        assert_eq!(alerts.current_type(), AlertType::None);

        // Moving re-arms
        monitor.evaluate(&mut alerts, 3, 0.25);
        assert!(!monitor.has_fired());
        for _ in 0..40 {
            monitor.evaluate(&mut alerts, 3, 0.25);
        }
        assert_eq!(alerts.current_type(), AlertType::Sedentary);
    }

    #[test]
    fn test_steps_clear_sedentary_alert() {
        let settings = alert_settings();
        let mut alerts = AlertController::new(&settings);
        let mut monitor = SedentaryMonitor::new(&settings);
        for _ in 0..40 {
            monitor.evaluate(&mut alerts, 0, 0.25);
        }
        assert_eq!(alerts.current_type(), AlertType::Sedentary);
        monitor.evaluate(&mut alerts, 1, 0.25);
        assert_eq!(alerts.current_type(), AlertType::None);
    }

    #[test]
    fn test_sedentary_waits_behind_heart_alert() {
        let settings = alert_settings();
        let mut alerts = AlertController::new(&settings);
        let mut monitor = SedentaryMonitor::new(&settings);
        alerts.show(AlertType::HeartHigh, "150 bpm");

        for _ in 0..40 {
            monitor.evaluate(&mut alerts, 0, 0.25);
        }
        assert_eq!(alerts.current_type(), AlertType::HeartHigh);
        assert!(!monitor.has_fired());

        alerts.clear(AlertType::HeartHigh);
        monitor.evaluate(&mut alerts, 0, 0.25);
        assert_eq!(alerts.current_type(), AlertType::Sedentary);
    }

    #[test]
    fn test_goal_fires_once_until_reset() {
        let mut goal = GoalTracker::new(100);
        assert!(!goal.check(99));
        assert!(goal.check(100));
        assert!(!goal.check(150));
        // External reset of the step count, then crossing again
        assert!(!goal.check(0));
        assert!(!goal.check(120));
        goal.reset();
        assert!(goal.check(120));
    }

    #[test]
    fn test_zero_goal_never_fires() {
        let mut goal = GoalTracker::new(0);
        assert!(!goal.check(0));
        assert!(!goal.check(10_000));
    }
}
