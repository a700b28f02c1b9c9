//! BioHUD headless driver
//!
//! Runs the HUD controllers against a synthetic head-motion trace and logs
//! what the renderer would be shown.
//!
//! Usage: `biohud [seed] [seconds] [settings.json]`

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use biohud::{HudDriver, HudFrame, HudSettings, Pose};

/// Render rate of the synthetic host loop
const FRAME_HZ: f32 = 90.0;
/// Seconds between summary lines
const SUMMARY_INTERVAL: f32 = 10.0;

/// Slow sway plus a quick 70 degree glance every 15 seconds
fn synthetic_pose(t: f32) -> Pose {
    let sway_yaw = 3.0 * (t * TAU * 0.2).sin();
    let sway_pitch = 1.5 * (t * TAU * 0.13).sin();

    let phase = t % 15.0;
    let glance = if phase < 0.25 {
        70.0 * phase / 0.25
    } else if phase < 3.0 {
        70.0
    } else if phase < 3.5 {
        70.0 * (1.0 - (phase - 3.0) / 0.5)
    } else {
        0.0
    };

    let orientation = Quat::from_rotation_y((sway_yaw + glance).to_radians())
        * Quat::from_rotation_x(sway_pitch.to_radians());
    Pose::new(Vec3::new(0.0, 1.65, 0.0), orientation)
}

fn summarize(t: f32, frame: &HudFrame, drift: f32) {
    log::info!(
        "[{:>6.1}s] {:<7} hr {:>5.1} ({:?}) steps {:>5} | alert {:?} a={:.2} {:?} | drift {:>5.1} deg",
        t,
        frame.activity.as_str(),
        frame.heart_rate,
        frame.band,
        frame.steps,
        frame.alert.kind,
        frame.alert.alpha,
        frame.alert.message,
        drift
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let seconds = args
        .get(2)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(300.0);

    let settings = match args.get(3) {
        Some(path) => match HudSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                HudSettings::default()
            }
        },
        None => HudSettings::default(),
    };

    log::info!("BioHUD starting (seed {seed}, {seconds:.0}s simulated)");
    let mut driver = HudDriver::new(&settings, seed);

    let dt = 1.0 / FRAME_HZ;
    let frames = (seconds * FRAME_HZ).round() as u64;
    let mut next_summary = 0.0;
    let mut goals = 0;
    let mut max_drift: f32 = 0.0;

    for i in 0..frames {
        let t = i as f32 * dt;
        let frame = driver.frame(dt, synthetic_pose(t));
        let drift = driver.stabilizer().drift_degrees();
        max_drift = max_drift.max(drift);

        if frame.goal_reached {
            goals += 1;
            log::info!("[{t:>6.1}s] Goal reached: {} steps", frame.steps);
        }
        if t >= next_summary {
            summarize(t, &frame, drift);
            next_summary += SUMMARY_INTERVAL;
        }
    }

    let sim = driver.simulator();
    log::info!(
        "Done: {} steps, final hr {:.1}, {} goal event(s), max anchor drift {:.1} deg",
        sim.steps(),
        sim.heart_rate(),
        goals,
        max_drift
    );
}
