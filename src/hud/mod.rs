//! HUD presentation driver
//!
//! Runs the two cadences the controllers live on:
//! - simulation ticks at a fixed rate (biometrics, alert evaluation)
//! - render frames at whatever `dt` the host supplies (stabilizer, fades,
//!   pulse, goal banner)

pub mod monitors;
pub mod pulse;

use rand_pcg::Pcg32;

pub use monitors::{GoalTracker, HeartAlertMonitor, SedentaryMonitor, format_heart_message};
pub use pulse::HeartPulse;

use crate::alert::{AlertController, AlertView};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::settings::HudSettings;
use crate::sim::{ActivitySimulator, ActivityState, HeartBand, RandomSource, seeded_rng};
use crate::stabilizer::{HeadLockStabilizer, HudPlacement, Pose};
use crate::timed::TimedOp;
use crate::valid_dt;

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudFrame {
    pub heart_rate: f32,
    pub steps: u64,
    pub activity: ActivityState,
    pub band: HeartBand,
    pub alert: AlertView,
    pub placement: HudPlacement,
    /// Heart icon scale multiplier
    pub pulse_scale: f32,
    pub goal_banner_visible: bool,
    /// Set on the one frame the step goal was reached
    pub goal_reached: bool,
    /// Simulation ticks run during this frame
    pub sim_ticks: u32,
}

/// Owns the three controllers and feeds them from the host loop
#[derive(Debug, Clone)]
pub struct HudDriver<R: RandomSource = Pcg32> {
    settings: HudSettings,
    simulator: ActivitySimulator<R>,
    alerts: AlertController,
    stabilizer: HeadLockStabilizer,
    heart_monitor: HeartAlertMonitor,
    sedentary_monitor: SedentaryMonitor,
    goal: GoalTracker,
    goal_banner: TimedOp<()>,
    goal_event: bool,
    pulse: HeartPulse,
    accumulator: f32,
    sim_time: f64,
}

impl HudDriver<Pcg32> {
    pub fn new(settings: &HudSettings, seed: u64) -> Self {
        Self::with_rng(settings, seeded_rng(seed))
    }
}

impl<R: RandomSource> HudDriver<R> {
    pub fn with_rng(settings: &HudSettings, rng: R) -> Self {
        let settings = settings.normalized();
        let presentation = &settings.presentation;
        Self {
            simulator: ActivitySimulator::with_rng(&settings.simulator, rng),
            alerts: AlertController::new(&settings.alerts),
            stabilizer: HeadLockStabilizer::new(&settings.stabilizer),
            heart_monitor: HeartAlertMonitor::new(&settings.alerts),
            sedentary_monitor: SedentaryMonitor::new(&settings.alerts),
            goal: GoalTracker::new(presentation.step_goal),
            goal_banner: TimedOp::new(),
            goal_event: false,
            pulse: HeartPulse::new(
                presentation.pulse_interval_seconds,
                presentation.pulse_seconds,
                presentation.pulse_scale,
            ),
            accumulator: 0.0,
            sim_time: 0.0,
            settings,
        }
    }

    /// Advance one render frame of `dt` seconds with the current head pose
    pub fn frame(&mut self, dt: f32, pose: Pose) -> HudFrame {
        let mut sim_ticks = 0;
        if valid_dt(dt) {
            let tick_dt = self.settings.presentation.tick_dt();
            self.accumulator += dt.min(MAX_FRAME_DT);
            while self.accumulator >= tick_dt && sim_ticks < MAX_SUBSTEPS {
                self.sim_tick(tick_dt);
                self.accumulator -= tick_dt;
                sim_ticks += 1;
            }
            if sim_ticks == MAX_SUBSTEPS && self.accumulator >= tick_dt {
                log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
                self.accumulator %= tick_dt;
            }
        }

        let placement = self.stabilizer.update(pose, dt);
        self.alerts.advance(dt);
        self.pulse.advance(dt);
        self.goal_banner.advance(dt);

        let heart_rate = self.simulator.heart_rate();
        let presentation = &self.settings.presentation;
        HudFrame {
            heart_rate,
            steps: self.simulator.steps(),
            activity: self.simulator.activity(),
            band: HeartBand::classify(heart_rate, presentation.band_low_bpm, presentation.band_high_bpm),
            alert: self.alerts.view(),
            placement,
            pulse_scale: self.pulse.scale_factor(),
            goal_banner_visible: self.goal_banner.is_running(),
            goal_reached: std::mem::take(&mut self.goal_event),
            sim_ticks,
        }
    }

    /// One fixed simulation step: biometrics, then alert conditions
    fn sim_tick(&mut self, dt: f32) {
        let previous = self.simulator.activity();
        self.simulator.tick(dt);
        self.sim_time += dt as f64;
        if self.simulator.activity() != previous {
            log::info!(
                "[{:>7.1}s] {} -> {} (hr {:.0}, steps {})",
                self.sim_time,
                previous.as_str(),
                self.simulator.activity().as_str(),
                self.simulator.heart_rate(),
                self.simulator.steps()
            );
        }

        let bpm = self.simulator.heart_rate();
        let steps = self.simulator.steps();
        self.heart_monitor.evaluate(&mut self.alerts, bpm, dt);
        self.sedentary_monitor.evaluate(&mut self.alerts, steps, dt);

        if self.goal.check(steps) {
            self.goal_event = true;
            self.goal_banner
                .start((), self.settings.presentation.goal_banner_seconds);
        }
    }

    /// Restart the biometric run. The goal latch stays set until `reset_goal`.
    pub fn reset_simulation(&mut self) {
        self.simulator.reset();
        self.accumulator = 0.0;
    }

    /// Re-arm the step goal
    pub fn reset_goal(&mut self) {
        self.goal.reset();
        self.goal_banner.cancel();
    }

    pub fn set_stabilizer_active(&mut self, active: bool) {
        self.stabilizer.set_active(active);
    }

    pub fn recenter(&mut self) {
        self.stabilizer.recenter();
    }

    pub fn trigger_pulse(&mut self) {
        self.pulse.trigger();
    }

    pub fn simulator(&self) -> &ActivitySimulator<R> {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut ActivitySimulator<R> {
        &mut self.simulator
    }

    pub fn alerts(&self) -> &AlertController {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut AlertController {
        &mut self.alerts
    }

    pub fn stabilizer(&self) -> &HeadLockStabilizer {
        &self.stabilizer
    }

    pub fn settings(&self) -> &HudSettings {
        &self.settings
    }

    /// Simulated seconds elapsed
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertType;
    use crate::settings::{AlertSettings, PresentationSettings, SimulatorSettings};
    use glam::Quat;

    const FRAME: f32 = 1.0 / 90.0;

    fn walking_settings(step_goal: u64) -> HudSettings {
        HudSettings {
            simulator: SimulatorSettings {
                episodic: false,
                direct_cadence: 2.0,
                ..Default::default()
            },
            presentation: PresentationSettings {
                step_goal,
                goal_banner_seconds: 2.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn run_for(driver: &mut HudDriver, seconds: f32) -> Vec<HudFrame> {
        let frames = (seconds / FRAME).round() as usize;
        (0..frames)
            .map(|_| driver.frame(FRAME, Pose::default()))
            .collect()
    }

    #[test]
    fn test_fixed_tick_rate_independent_of_frame_rate() {
        // Power-of-two timings so both frame rates land on exact tick boundaries
        let settings = HudSettings {
            simulator: SimulatorSettings {
                episode_min_seconds: 5.0,
                episode_max_seconds: 6.0,
                escalate_probability: 0.9,
                ..Default::default()
            },
            presentation: PresentationSettings {
                tick_hz: 8.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut fast = HudDriver::new(&settings, 1);
        let mut slow = HudDriver::new(&settings, 1);
        let fast_ticks: u32 = (0..1280)
            .map(|_| fast.frame(1.0 / 128.0, Pose::default()).sim_ticks)
            .sum();
        let slow_ticks: u32 = (0..320)
            .map(|_| slow.frame(1.0 / 32.0, Pose::default()).sim_ticks)
            .sum();

        assert_eq!(fast_ticks, 80);
        assert_eq!(slow_ticks, 80);
        assert_eq!(fast.sim_time(), 10.0);
        assert_eq!(slow.sim_time(), 10.0);
        // Same seed and same ticks: identical biometrics
        assert_eq!(fast.simulator().state(), slow.simulator().state());
    }

    #[test]
    fn test_fast_tick_rate_keeps_up_with_wall_clock() {
        let settings = HudSettings {
            presentation: PresentationSettings {
                tick_hz: 1000.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut driver = HudDriver::new(&settings, 4);
        run_for(&mut driver, 10.0);
        assert!((driver.sim_time() - 10.0).abs() < 0.02, "sim_time {}", driver.sim_time());

        // A full clamped frame fits the substep budget
        let frame = driver.frame(MAX_FRAME_DT, Pose::default());
        assert!(frame.sim_ticks <= MAX_SUBSTEPS);
        assert!((driver.sim_time() - 10.1).abs() < 0.03);
    }

    #[test]
    fn test_invalid_frame_dt_runs_no_ticks() {
        let mut driver = HudDriver::new(&HudSettings::default(), 2);
        let frame = driver.frame(0.0, Pose::default());
        assert_eq!(frame.sim_ticks, 0);
        let frame = driver.frame(-0.5, Pose::default());
        assert_eq!(frame.sim_ticks, 0);
        assert_eq!(driver.sim_time(), 0.0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut driver = HudDriver::new(&HudSettings::default(), 2);
        let frame = driver.frame(5.0, Pose::default());
        assert_eq!(frame.sim_ticks, 1);
    }

    #[test]
    fn test_goal_fires_once_across_reset() {
        let mut driver = HudDriver::new(&walking_settings(40), 3);
        let frames = run_for(&mut driver, 30.0);
        let hits = frames.iter().filter(|f| f.goal_reached).count();
        assert_eq!(hits, 1);
        let hit = frames.iter().position(|f| f.goal_reached).unwrap();
        assert!(frames[hit].goal_banner_visible);
        assert!(frames[hit].steps >= 40);
        // Banner auto-expires
        assert!(!frames.last().unwrap().goal_banner_visible);

        // Cross the goal again after an external reset: latch holds
        driver.reset_simulation();
        assert_eq!(driver.simulator().steps(), 0);
        let frames = run_for(&mut driver, 30.0);
        assert!(frames.last().unwrap().steps >= 40);
        assert!(frames.iter().all(|f| !f.goal_reached));

        // Explicit re-arm lets it fire again
        driver.reset_goal();
        let frames = run_for(&mut driver, 1.0);
        assert_eq!(frames.iter().filter(|f| f.goal_reached).count(), 1);
    }

    #[test]
    fn test_sedentary_reminder_when_idle() {
        let settings = HudSettings {
            simulator: SimulatorSettings {
                episodic: false,
                direct_cadence: 0.0,
                ..Default::default()
            },
            alerts: AlertSettings {
                sedentary_after_seconds: 3.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut driver = HudDriver::new(&settings, 4);
        let frames = run_for(&mut driver, 2.5);
        assert_eq!(frames.last().unwrap().alert.kind, AlertType::None);
        let frames = run_for(&mut driver, 2.0);
        let last = frames.last().unwrap();
        assert_eq!(last.alert.kind, AlertType::Sedentary);
        assert_eq!(last.alert.message, "Time to move!");
        assert!(last.alert.visible);
    }

    #[test]
    fn test_heart_alert_from_simulation() {
        // Pin the heart above the alert threshold
        let settings = HudSettings {
            simulator: SimulatorSettings {
                heart_baseline: 150.0,
                episodic: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut driver = HudDriver::new(&settings, 5);
        let frames = run_for(&mut driver, 1.0);
        let last = frames.last().unwrap();
        assert_eq!(last.alert.kind, AlertType::HeartHigh);
        assert_eq!(last.band, HeartBand::High);
        assert!(last.alert.message.starts_with("Heart rate high:"));
    }

    #[test]
    fn test_band_and_pulse_reported() {
        let mut driver = HudDriver::new(&HudSettings::default(), 6);
        let frames = run_for(&mut driver, 3.0);
        assert!(frames.iter().all(|f| f.band == HeartBand::Low));
        assert!(frames.iter().any(|f| f.pulse_scale > 1.0));
        assert!(frames.iter().all(|f| f.pulse_scale >= 1.0));
    }

    #[test]
    fn test_placement_tracks_stabilizer() {
        let mut driver = HudDriver::new(&HudSettings::default(), 7);
        let start = driver.frame(FRAME, Pose::looking(Quat::IDENTITY)).placement;
        let small = driver
            .frame(FRAME, Pose::looking(Quat::from_rotation_y(2.0_f32.to_radians())))
            .placement;
        assert_eq!(start, small);

        driver.set_stabilizer_active(false);
        let turned = Quat::from_rotation_y(2.0_f32.to_radians());
        let rigid = driver.frame(FRAME, Pose::looking(turned)).placement;
        assert!(rigid.rotation.abs_diff_eq(turned, 1e-6));
    }
}
