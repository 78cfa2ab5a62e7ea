//! [`JointMonitor`] – periodic health simulation for every joint.
//!
//! The monitor keeps exactly one [`SensorRecord`] and one floating label per
//! joint of the robot it was built for.  Each [`tick`][JointMonitor::tick]
//! simulates, classifies, logs and reflects every joint in declaration order.
//! Panel entries are created lazily on a joint's first tick.
//!
//! # Example
//!
//! ```rust
//! use jointview_hal::sim::SimRobot;
//! use jointview_monitor::{JointMonitor, MonitorConfig};
//! use jointview_types::RecordingUi;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let robot = SimRobot::six_axis_arm().build();
//! let mut ui = RecordingUi::new();
//! let mut monitor = JointMonitor::new(&robot, &mut ui, MonitorConfig::default());
//!
//! let report = monitor.tick(&robot, &mut ui, &mut StdRng::seed_from_u64(0));
//! assert_eq!(report.evaluated, 7);
//! ```

use std::collections::HashSet;
use std::time::Duration;

use jointview_hal::Robot;
use jointview_types::{AlertFlags, JointValue, SensorRecord, Status, UiSurface};
use rand::Rng;
use tracing::{debug, warn};

use crate::display;
use crate::sensor;

/// Default period between monitor ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub tick_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Health bookkeeping for one joint.
#[derive(Debug, Clone)]
pub struct JointHealth {
    pub name: String,
    pub record: SensorRecord,
    pub flags: AlertFlags,
    /// Joint value seen at the previous tick.
    last_value: Option<JointValue>,
}

impl JointHealth {
    fn new(name: String) -> Self {
        Self {
            name,
            record: SensorRecord::default(),
            flags: AlertFlags::default(),
            last_value: None,
        }
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub evaluated: usize,
    /// Alert lines emitted this tick, in joint order.
    pub alerts: Vec<String>,
}

pub struct JointMonitor {
    config: MonitorConfig,
    joints: Vec<JointHealth>,
    entries: HashSet<String>,
}

impl JointMonitor {
    /// Build the monitor for `robot`: creates the panel, the label style
    /// sheet and one label per joint.
    pub fn new(robot: &Robot, ui: &mut dyn UiSurface, config: MonitorConfig) -> Self {
        display::create_panel(ui);
        display::install_label_styles(ui);

        let mut joints = Vec::with_capacity(robot.joint_count());
        for joint in robot.joints() {
            let name = joint.name().to_string();
            display::create_label(ui, &name, robot.anchor_for(&name));
            joints.push(JointHealth::new(name));
        }
        debug!(joints = joints.len(), "Joint monitor initialised");

        Self {
            config,
            joints,
            entries: HashSet::new(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval
    }

    pub fn joints(&self) -> &[JointHealth] {
        &self.joints
    }

    pub fn health(&self, joint: &str) -> Option<&JointHealth> {
        self.joints.iter().find(|h| h.name == joint)
    }

    /// Worst status across all joints.
    pub fn worst_status(&self) -> Status {
        self.joints
            .iter()
            .map(|h| h.record.status)
            .max()
            .unwrap_or_default()
    }

    /// Direct access to a joint's readings, e.g. to inject a value.
    pub fn record_mut(&mut self, joint: &str) -> Option<&mut SensorRecord> {
        self.joints
            .iter_mut()
            .find(|h| h.name == joint)
            .map(|h| &mut h.record)
    }

    /// Run one monitoring pass over every joint.
    pub fn tick<R: Rng>(
        &mut self,
        robot: &Robot,
        ui: &mut dyn UiSurface,
        rng: &mut R,
    ) -> TickReport {
        let mut report = TickReport::default();
        for index in 0..self.joints.len() {
            let health = &mut self.joints[index];
            let Some(joint) = robot.joint(&health.name) else {
                continue;
            };

            let current = joint.value();
            let moving = health.last_value.as_ref().is_some_and(|last| last != current);
            health.last_value = Some(current.clone());
            sensor::simulate(&mut health.record, moving, &mut *rng);

            if let Some(line) = self.evaluate_at(index, ui) {
                report.alerts.push(line);
            }
            report.evaluated += 1;
        }
        report
    }

    /// Classify, log and reflect `joint` without advancing the simulation.
    /// Returns the alert line when the joint is not normal.
    pub fn evaluate(&mut self, joint: &str, ui: &mut dyn UiSurface) -> Option<String> {
        let index = self.joints.iter().position(|h| h.name == joint)?;
        self.evaluate_at(index, ui)
    }

    fn evaluate_at(&mut self, index: usize, ui: &mut dyn UiSurface) -> Option<String> {
        let health = &mut self.joints[index];
        let (flags, status) = sensor::classify(&health.record);
        health.flags = flags;
        health.record.status = status;

        if self.entries.insert(health.name.clone()) {
            display::create_entry(ui, &health.name);
        }
        let line = (status != Status::Normal).then(|| {
            let line = sensor::alert_line(&health.name, &health.record, flags);
            warn!(joint = %health.name, status = %status, "{line}");
            line
        });

        display::reflect_entry(ui, &health.name, &health.record);
        display::reflect_label(ui, &health.name, &health.record, flags);
        line
    }
}
