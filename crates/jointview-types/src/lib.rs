//! `jointview-types` – shared vocabulary for every JointView crate.
//!
//! Joint metadata, sensor readings, UI patches sent to the browser, input
//! events received from it, the [`Event`] envelope routed over the bus, and
//! the workspace-wide [`ViewError`].

pub mod ui;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use ui::{ElementKind, ElementSpec, RecordingUi, UiPatch, UiSurface};

// ────────────────────────────────────────────────────────────────────────────
// Joints
// ────────────────────────────────────────────────────────────────────────────

/// Kinematic joint type as declared in the URDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    Revolute,
    Continuous,
    Prismatic,
    Fixed,
    Floating,
    Planar,
    Spherical,
}

impl JointType {
    /// Number of values the joint carries.  Zero for fixed joints.
    pub fn dof(self) -> usize {
        match self {
            JointType::Fixed => 0,
            JointType::Revolute | JointType::Continuous | JointType::Prismatic => 1,
            JointType::Planar | JointType::Spherical => 3,
            JointType::Floating => 6,
        }
    }

    /// `true` for the joint types whose URDF limits are never enforced.
    pub fn is_unbounded(self) -> bool {
        matches!(self, JointType::Continuous | JointType::Fixed)
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JointType::Revolute => "revolute",
            JointType::Continuous => "continuous",
            JointType::Prismatic => "prismatic",
            JointType::Fixed => "fixed",
            JointType::Floating => "floating",
            JointType::Planar => "planar",
            JointType::Spherical => "spherical",
        };
        f.write_str(s)
    }
}

/// Current position of a joint: a single angle/offset, or one value per
/// degree of freedom for multi-DOF joints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JointValue {
    Scalar(f64),
    Multi(Vec<f64>),
}

impl JointValue {
    /// Zero value shaped for `joint_type`.
    pub fn zero_for(joint_type: JointType) -> Self {
        match joint_type.dof() {
            0 | 1 => JointValue::Scalar(0.0),
            n => JointValue::Multi(vec![0.0; n]),
        }
    }

    /// Return the value shifted by `delta`.  Multi-DOF values shift their
    /// first component only.
    pub fn offset(&self, delta: f64) -> Self {
        match self {
            JointValue::Scalar(v) => JointValue::Scalar(v + delta),
            JointValue::Multi(values) => {
                let mut values = values.clone();
                if let Some(first) = values.first_mut() {
                    *first += delta;
                }
                JointValue::Multi(values)
            }
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            JointValue::Scalar(v) => Some(*v),
            JointValue::Multi(_) => None,
        }
    }
}

impl fmt::Display for JointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointValue::Scalar(v) => write!(f, "{v}"),
            JointValue::Multi(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// Lower/upper position bounds in radians (or metres for prismatic joints).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointLimit {
    pub lower: f64,
    pub upper: f64,
}

impl JointLimit {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Position of one joint, as pushed to the renderer after a jog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointPose {
    pub name: String,
    pub value: JointValue,
}

// ────────────────────────────────────────────────────────────────────────────
// Health monitoring
// ────────────────────────────────────────────────────────────────────────────

/// Alert level of a joint.  Ordered so that the worst level is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated environmental readings for a single joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Hectopascal.
    pub pressure: f64,
    pub status: Status,
}

impl Default for SensorRecord {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 40.0,
            pressure: 1013.0,
            status: Status::Normal,
        }
    }
}

/// Which metrics of a joint are currently outside their nominal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertFlags {
    pub temperature: bool,
    pub humidity: bool,
    pub pressure: bool,
}

impl AlertFlags {
    pub fn any(&self) -> bool {
        self.temperature || self.humidity || self.pressure
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Browser input
// ────────────────────────────────────────────────────────────────────────────

/// User input forwarded from the viewer page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum InputEvent {
    /// A key went down (`pressed = true`) or up.
    Key { key: String, pressed: bool },
    /// The speed slider moved; value in degrees per frame.
    Speed { degrees: f64 },
    /// A button or collapsible header was clicked.
    Click { id: String },
    /// The browser window changed size.
    Resize {
        width: u32,
        height: u32,
        pixel_ratio: f64,
    },
    /// The page finished loading the model and wants the current UI state.
    Ready,
}

// ────────────────────────────────────────────────────────────────────────────
// Event envelope
// ────────────────────────────────────────────────────────────────────────────

/// Unified event wrapper for the scene bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g. `"jointview-runtime::scene"`
    pub source: String,
    pub payload: EventPayload,
}

impl Event {
    /// Stamp `payload` with a fresh id and the current time.
    pub fn new(source: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }
}

/// Variants of data routed over the scene bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// A DOM mutation for the viewer page.
    Ui(UiPatch),
    /// New joint positions for the renderer.
    Pose(Vec<JointPose>),
    /// User input received from a browser tab.
    Input(InputEvent),
    /// Render surface, label surface and camera must adopt these values.
    StageResized {
        width: u32,
        height: u32,
        pixel_ratio: f64,
        aspect: f64,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Workspace-wide error type.  Only start-up paths produce it; the per-frame
/// and per-tick paths absorb every failure locally.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("URDF load failed for {path}: {details}")]
    UrdfLoad { path: String, details: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering_puts_critical_on_top() {
        assert!(Status::Normal < Status::Warning);
        assert!(Status::Warning < Status::Critical);
        assert_eq!(
            [Status::Warning, Status::Critical, Status::Normal]
                .into_iter()
                .max(),
            Some(Status::Critical)
        );
    }

    #[test]
    fn joint_value_offset_shifts_first_dof_only() {
        let v = JointValue::Multi(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.offset(0.5), JointValue::Multi(vec![1.5, 2.0, 3.0]));
        assert_eq!(JointValue::Scalar(1.0).offset(-0.25), JointValue::Scalar(0.75));
    }

    #[test]
    fn zero_value_matches_dof() {
        assert_eq!(JointValue::zero_for(JointType::Fixed), JointValue::Scalar(0.0));
        assert_eq!(JointValue::zero_for(JointType::Revolute), JointValue::Scalar(0.0));
        assert_eq!(
            JointValue::zero_for(JointType::Floating),
            JointValue::Multi(vec![0.0; 6])
        );
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        let limit = JointLimit { lower: -1.0, upper: 1.0 };
        assert!(limit.contains(-1.0));
        assert!(limit.contains(1.0));
        assert!(!limit.contains(1.000_001));
    }

    #[test]
    fn input_event_parses_from_browser_json() {
        let json = r#"{"input":"key","key":"q","pressed":true}"#;
        let ev: InputEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            ev,
            InputEvent::Key {
                key: "q".to_string(),
                pressed: true
            }
        );
    }

    #[test]
    fn pose_event_serializes_scalar_as_number() {
        let event = Event::new(
            "test",
            EventPayload::Pose(vec![JointPose {
                name: "shoulder".to_string(),
                value: JointValue::Scalar(0.5),
            }]),
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""value":0.5"#), "{json}");
    }

    #[test]
    fn view_error_display() {
        let err = ViewError::UrdfLoad {
            path: "/URDF/genkiarm.urdf".to_string(),
            details: "missing robot tag".to_string(),
        };
        assert!(err.to_string().contains("genkiarm.urdf"));
    }
}
