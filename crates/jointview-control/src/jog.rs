//! [`JogController`] – keyboard joint jogging.
//!
//! Each frame, every held key that has a [`KeyBinding`] nudges one joint by
//! `direction × step`.  Joints are addressed by index into the robot's
//! non-fixed joints, captured once at construction.  A step that would
//! leave the joint's URDF limits is dropped for that frame and surfaced as a
//! transient alert plus a `warn!` line; nothing is ever returned as an
//! error.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use jointview_control::jog::{JogConfig, JogController};
//! use jointview_hal::sim::SimRobot;
//! use jointview_types::RecordingUi;
//!
//! let mut robot = SimRobot::six_axis_arm().build();
//! let mut ui = RecordingUi::new();
//! let mut jog = JogController::new(&robot, JogConfig::default());
//!
//! jog.key_down("q", &mut ui, Instant::now());
//! let outcome = jog.update(&mut robot, &mut ui, Instant::now());
//! assert_eq!(outcome.moved, vec!["joint1".to_string()]);
//! ```

use std::time::{Duration, Instant};

use jointview_hal::Robot;
use jointview_types::UiSurface;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::activity::{ActivityHighlight, DEFAULT_HIGHLIGHT_WINDOW};
use crate::alert::{AlertKind, DEFAULT_ALERT_DURATION, TransientAlert};
use crate::keymap::KeyMap;
use crate::limits;
use crate::page;

/// Slider value used until the user moves it, in degrees.
pub const DEFAULT_SPEED_DEG: f64 = 0.2;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Source of joint commands.  Only `Keyboard` drives the jog loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Keyboard,
    /// Joint values are streamed from an external device.
    Realtime,
}

/// Construction parameters for [`JogController`].
#[derive(Debug, Clone)]
pub struct JogConfig {
    pub mode: ControlMode,
    /// Initial step per frame, in degrees.
    pub speed_deg: f64,
    pub alert_duration: Duration,
    pub highlight_window: Duration,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Keyboard,
            speed_deg: DEFAULT_SPEED_DEG,
            alert_duration: DEFAULT_ALERT_DURATION,
            highlight_window: DEFAULT_HIGHLIGHT_WINDOW,
        }
    }
}

/// What one call to [`JogController::update`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Joints whose value changed this frame.
    pub moved: Vec<String>,
    /// Joints whose step was rejected by the limit check.
    pub blocked: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// JogController
// ────────────────────────────────────────────────────────────────────────────

pub struct JogController {
    mode: ControlMode,
    key_map: KeyMap,
    /// Held keys, lower-cased, in press order.
    held: Vec<String>,
    speed_deg: f64,
    step_rad: f64,
    joint_names: Vec<String>,
    limit_alert: TransientAlert,
    highlight: ActivityHighlight,
}

impl JogController {
    /// Capture the robot's movable joints and build a controller.
    pub fn new(robot: &Robot, config: JogConfig) -> Self {
        let joint_names = robot.movable_joint_names();
        info!(joints = ?joint_names, "Available joints");
        Self {
            mode: config.mode,
            key_map: KeyMap::default(),
            held: Vec::new(),
            speed_deg: config.speed_deg,
            step_rad: config.speed_deg.to_radians(),
            joint_names,
            limit_alert: TransientAlert::new(AlertKind::Joint, config.alert_duration),
            highlight: ActivityHighlight::new(config.highlight_window),
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        if mode != self.mode {
            info!(?mode, "Control mode changed");
        }
        self.mode = mode;
    }

    /// Current step size in radians.
    pub fn step_rad(&self) -> f64 {
        self.step_rad
    }

    pub fn speed_deg(&self) -> f64 {
        self.speed_deg
    }

    /// Joints addressable by key index, in order.
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    pub fn is_held(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.held.contains(&key)
    }

    /// Apply a slider change.  Non-finite or non-positive values are
    /// ignored.  Returns `true` when the step size changed.
    pub fn set_speed_degrees(&mut self, degrees: f64, ui: &mut dyn UiSurface) -> bool {
        if !degrees.is_finite() || degrees <= 0.0 {
            debug!(degrees, "Ignoring invalid speed");
            return false;
        }
        self.speed_deg = degrees;
        self.step_rad = degrees.to_radians();
        if ui.exists(page::SPEED_VALUE) {
            ui.set_text(page::SPEED_VALUE, &format!("{degrees:.1}"));
        }
        true
    }

    /// A key went down.
    pub fn key_down(&mut self, key: &str, ui: &mut dyn UiSurface, now: Instant) {
        let key = key.to_lowercase();
        let indicator = page::key_indicator(&key);
        if !self.held.contains(&key) {
            self.held.push(key);
        }
        if ui.exists(&indicator) {
            ui.set_class(&indicator, "key key-pressed");
            self.highlight.touch(ui, now);
        }
    }

    /// A key was released.
    pub fn key_up(&mut self, key: &str, ui: &mut dyn UiSurface) {
        let key = key.to_lowercase();
        let indicator = page::key_indicator(&key);
        self.held.retain(|k| *k != key);
        if ui.exists(&indicator) {
            ui.set_class(&indicator, "key");
        }
    }

    /// Advance every held joint by one step.  Call once per rendered frame.
    pub fn update(&mut self, robot: &mut Robot, ui: &mut dyn UiSurface, now: Instant) -> FrameOutcome {
        self.limit_alert.expire(ui, now);
        self.highlight.expire(ui, now);

        let mut outcome = FrameOutcome::default();
        if self.mode != ControlMode::Keyboard || robot.joint_count() == 0 {
            return outcome;
        }

        let mut key_pressed = false;
        for key in &self.held {
            let Some(binding) = self.key_map.binding(key) else {
                continue;
            };
            key_pressed = true;

            let Some(name) = self.joint_names.get(binding.joint_index) else {
                continue;
            };
            let Some(joint) = robot.joint(name) else {
                continue;
            };

            let delta = f64::from(binding.direction) * self.step_rad;
            let candidate = joint.value().offset(delta);

            if let Err(violation) = limits::check(joint, &candidate) {
                warn!(
                    joint = %name,
                    candidate = violation.candidate,
                    lower = violation.limit.lower,
                    upper = violation.limit.upper,
                    "{violation}"
                );
                self.limit_alert
                    .show(ui, &format!("Joint {name} has reached its limit!"), now);
                outcome.blocked.push(name.clone());
                continue;
            }

            robot.set_joint_value(name, candidate);
            outcome.moved.push(name.clone());
        }

        if key_pressed {
            self.highlight.touch(ui, now);
        }
        if !outcome.moved.is_empty() {
            robot.mark_world_dirty();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_hal::Joint;
    use jointview_hal::sim::SimRobot;
    use jointview_types::{JointType, JointValue, RecordingUi};

    fn page_ui() -> RecordingUi {
        let ids = page::static_elements();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        RecordingUi::new().with_elements(&refs)
    }

    fn value(robot: &Robot, name: &str) -> f64 {
        robot.joint(name).unwrap().value().as_scalar().unwrap()
    }

    #[test]
    fn default_step_is_point_two_degrees() {
        let robot = SimRobot::six_axis_arm().build();
        let jog = JogController::new(&robot, JogConfig::default());
        assert!((jog.step_rad() - 0.2_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn held_key_advances_joint_each_frame() {
        let mut robot = SimRobot::six_axis_arm().build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        let now = Instant::now();

        jog.key_down("q", &mut ui, now);
        jog.update(&mut robot, &mut ui, now);
        jog.update(&mut robot, &mut ui, now);

        let expected = 2.0 * 0.2_f64.to_radians();
        assert!((value(&robot, "joint1") - expected).abs() < 1e-12);
        assert!(robot.is_world_dirty());
    }

    #[test]
    fn released_key_stops_motion() {
        let mut robot = SimRobot::six_axis_arm().build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        let now = Instant::now();

        jog.key_down("w", &mut ui, now);
        jog.update(&mut robot, &mut ui, now);
        jog.key_up("W", &mut ui);
        let outcome = jog.update(&mut robot, &mut ui, now);

        assert!(outcome.moved.is_empty());
        assert!(!jog.is_held("w"));
        assert_eq!(ui.class("key-w"), Some("key"));
    }

    #[test]
    fn fixed_joints_are_skipped_when_indexing() {
        let mut robot = SimRobot::six_axis_arm().build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        jog.key_down("1", &mut ui, Instant::now());
        let outcome = jog.update(&mut robot, &mut ui, Instant::now());
        assert_eq!(outcome.moved, vec!["joint1".to_string()]);
        assert_eq!(robot.joint("base_mount").unwrap().value(), &JointValue::Scalar(0.0));
    }

    #[test]
    fn index_beyond_joint_count_is_skipped_silently() {
        let mut robot = SimRobot::new("short")
            .with_revolute("only", -1.0, 1.0)
            .build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        jog.key_down("y", &mut ui, Instant::now());
        let outcome = jog.update(&mut robot, &mut ui, Instant::now());
        assert_eq!(outcome, FrameOutcome::default());
        assert!(!robot.is_world_dirty());
    }

    #[test]
    fn joint_at_upper_limit_stays_and_alerts() {
        let mut robot = SimRobot::new("arm")
            .with_joint(
                Joint::new("lift", JointType::Revolute)
                    .with_limit(-1.0, 1.0)
                    .with_value(JointValue::Scalar(1.0)),
            )
            .build();
        let mut ui = page_ui();
        ui.hide(page::JOINT_LIMIT_ALERT);
        let mut jog = JogController::new(&robot, JogConfig::default());
        let now = Instant::now();

        jog.key_down("q", &mut ui, now);
        let outcome = jog.update(&mut robot, &mut ui, now);

        assert_eq!(outcome.blocked, vec!["lift".to_string()]);
        assert!(outcome.moved.is_empty());
        assert!((value(&robot, "lift") - 1.0).abs() < f64::EPSILON);
        assert!(!robot.is_world_dirty());
        assert!(ui.is_visible(page::JOINT_LIMIT_ALERT));
        assert_eq!(
            ui.text(page::JOINT_LIMIT_ALERT),
            Some("Joint lift has reached its limit!")
        );

        jog.key_up("q", &mut ui);
        jog.update(&mut robot, &mut ui, now + Duration::from_secs(3));
        assert!(!ui.is_visible(page::JOINT_LIMIT_ALERT));
    }

    #[test]
    fn update_applied_iff_candidate_within_limits() {
        let step = 0.2_f64.to_radians();
        for start in [-1.0, -1.0 + step / 2.0, 0.0, 1.0 - step, 1.0 - step / 2.0, 1.0] {
            let mut robot = SimRobot::new("arm")
                .with_joint(
                    Joint::new("j", JointType::Revolute)
                        .with_limit(-1.0, 1.0)
                        .with_value(JointValue::Scalar(start)),
                )
                .build();
            let mut ui = page_ui();
            let mut jog = JogController::new(&robot, JogConfig::default());
            jog.key_down("q", &mut ui, Instant::now());
            jog.update(&mut robot, &mut ui, Instant::now());

            let candidate = start + step;
            let expected = if candidate <= 1.0 { candidate } else { start };
            assert!(
                (value(&robot, "j") - expected).abs() < 1e-12,
                "start={start}"
            );
        }
    }

    #[test]
    fn unbounded_joints_accept_any_delta() {
        let mut robot = SimRobot::new("arm")
            .with_continuous("spin")
            .with_joint(
                Joint::new("free_rev", JointType::Revolute)
                    .with_limit(0.0, 0.0)
                    .with_ignore_limits(true),
            )
            .build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        jog.set_speed_degrees(90.0, &mut ui);
        let now = Instant::now();
        jog.key_down("q", &mut ui, now);
        jog.key_down("w", &mut ui, now);
        for _ in 0..10 {
            jog.update(&mut robot, &mut ui, now);
        }
        let expected = 10.0 * std::f64::consts::FRAC_PI_2;
        assert!((value(&robot, "spin") - expected).abs() < 1e-9);
        assert!((value(&robot, "free_rev") - expected).abs() < 1e-9);
    }

    #[test]
    fn multi_dof_joint_moves_first_component() {
        let mut robot = SimRobot::new("base")
            .with_joint(Joint::new("planar", JointType::Planar))
            .build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        jog.key_down("1", &mut ui, Instant::now());
        jog.update(&mut robot, &mut ui, Instant::now());
        let step = 0.2_f64.to_radians();
        assert_eq!(
            robot.joint("planar").unwrap().value(),
            &JointValue::Multi(vec![-step, 0.0, 0.0])
        );
    }

    #[test]
    fn non_keyboard_mode_short_circuits() {
        let mut robot = SimRobot::six_axis_arm().build();
        let mut ui = page_ui();
        let mut jog = JogController::new(
            &robot,
            JogConfig {
                mode: ControlMode::Realtime,
                ..JogConfig::default()
            },
        );
        jog.key_down("q", &mut ui, Instant::now());
        assert_eq!(jog.update(&mut robot, &mut ui, Instant::now()), FrameOutcome::default());
        jog.set_mode(ControlMode::Keyboard);
        assert_eq!(jog.update(&mut robot, &mut ui, Instant::now()).moved.len(), 1);
    }

    #[test]
    fn speed_slider_changes_step_and_display() {
        let robot = SimRobot::six_axis_arm().build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        assert!(jog.set_speed_degrees(2.5, &mut ui));
        assert!((jog.step_rad() - 2.5_f64.to_radians()).abs() < 1e-12);
        assert_eq!(ui.text(page::SPEED_VALUE), Some("2.5"));
        assert!(!jog.set_speed_degrees(f64::NAN, &mut ui));
        assert!(!jog.set_speed_degrees(-1.0, &mut ui));
        assert!((jog.speed_deg() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn key_activity_highlights_section_for_two_seconds() {
        let mut robot = SimRobot::six_axis_arm().build();
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        let t0 = Instant::now();
        jog.key_down("e", &mut ui, t0);
        assert_eq!(ui.class("key-e"), Some("key key-pressed"));
        assert_eq!(
            ui.class(page::KEYBOARD_SECTION),
            Some("control-section control-active")
        );

        // Holding the key keeps extending the window.
        jog.update(&mut robot, &mut ui, t0 + Duration::from_millis(1900));
        jog.key_up("e", &mut ui);
        jog.update(&mut robot, &mut ui, t0 + Duration::from_millis(3000));
        assert_eq!(
            ui.class(page::KEYBOARD_SECTION),
            Some("control-section control-active")
        );
        jog.update(&mut robot, &mut ui, t0 + Duration::from_millis(3900));
        assert_eq!(ui.class(page::KEYBOARD_SECTION), Some("control-section"));
    }

    #[test]
    fn missing_page_elements_are_tolerated() {
        let mut robot = SimRobot::new("arm")
            .with_joint(
                Joint::new("lift", JointType::Revolute)
                    .with_limit(0.0, 0.0),
            )
            .build();
        let mut ui = RecordingUi::new();
        let mut jog = JogController::new(&robot, JogConfig::default());
        jog.key_down("q", &mut ui, Instant::now());
        let outcome = jog.update(&mut robot, &mut ui, Instant::now());
        assert_eq!(outcome.blocked, vec!["lift".to_string()]);
        assert!(ui.created().is_empty());
    }

    #[test]
    fn empty_robot_is_noop() {
        let mut robot = Robot::new("empty");
        let mut ui = page_ui();
        let mut jog = JogController::new(&robot, JogConfig::default());
        jog.key_down("q", &mut ui, Instant::now());
        assert_eq!(jog.update(&mut robot, &mut ui, Instant::now()), FrameOutcome::default());
    }
}
