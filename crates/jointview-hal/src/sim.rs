//! In-process robot builder for tests and headless runs.
//!
//! [`SimRobot`] assembles a [`Robot`] without any URDF file.  Joints added
//! through the `with_*` helpers also get a scene-graph node of the same
//! name, like a URDF-loaded robot would; use
//! [`with_detached_joint`][SimRobot::with_detached_joint] for a joint the
//! renderer has no node for.
//!
//! # Example
//!
//! ```rust
//! use jointview_hal::sim::SimRobot;
//!
//! let robot = SimRobot::new("arm")
//!     .with_fixed("mount")
//!     .with_revolute("shoulder", -1.0, 1.0)
//!     .build();
//!
//! assert_eq!(robot.movable_joint_names(), vec!["shoulder"]);
//! ```

use jointview_types::JointType;

use crate::robot::{Joint, Robot};

/// Builder producing a [`Robot`] populated with simulated joints.
pub struct SimRobot {
    robot: Robot,
}

impl SimRobot {
    /// Start an empty robot named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            robot: Robot::new(name),
        }
    }

    /// A six-axis desk arm on a fixed mount, limits ±90° except the wrist
    /// roll which is continuous.
    pub fn six_axis_arm() -> Self {
        let quarter = std::f64::consts::FRAC_PI_2;
        Self::new("sim_arm")
            .with_fixed("base_mount")
            .with_revolute("joint1", -quarter, quarter)
            .with_revolute("joint2", -quarter, quarter)
            .with_revolute("joint3", -quarter, quarter)
            .with_revolute("joint4", -quarter, quarter)
            .with_revolute("joint5", -quarter, quarter)
            .with_continuous("joint6")
    }

    pub fn with_revolute(self, name: &str, lower: f64, upper: f64) -> Self {
        self.with_joint(Joint::new(name, JointType::Revolute).with_limit(lower, upper))
    }

    pub fn with_prismatic(self, name: &str, lower: f64, upper: f64) -> Self {
        self.with_joint(Joint::new(name, JointType::Prismatic).with_limit(lower, upper))
    }

    pub fn with_continuous(self, name: &str) -> Self {
        self.with_joint(Joint::new(name, JointType::Continuous))
    }

    pub fn with_fixed(self, name: &str) -> Self {
        self.with_joint(Joint::new(name, JointType::Fixed))
    }

    /// Add a pre-built joint together with a node of the same name.
    pub fn with_joint(mut self, joint: Joint) -> Self {
        self.robot.add_node(joint.name().to_string());
        self.robot.add_joint(joint);
        self
    }

    /// Add a joint without a matching scene-graph node.
    pub fn with_detached_joint(mut self, joint: Joint) -> Self {
        self.robot.add_joint(joint);
        self
    }

    pub fn build(self) -> Robot {
        self.robot
    }
}
