//! [`Robot`] – ordered joint collection plus the scene-graph node names the
//! renderer knows about.
//!
//! Joint order is the URDF declaration order.  The jog controller relies on
//! it to map key indices onto joints, so [`Robot::add_joint`] never
//! reorders existing entries.

use jointview_types::{JointLimit, JointPose, JointType, JointValue};

/// A single kinematic joint.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    name: String,
    joint_type: JointType,
    value: JointValue,
    limit: JointLimit,
    ignore_limits: bool,
    child_link: String,
}

impl Joint {
    /// Create a joint at its zero position with an empty limit range.
    pub fn new(name: impl Into<String>, joint_type: JointType) -> Self {
        Self {
            name: name.into(),
            joint_type,
            value: JointValue::zero_for(joint_type),
            limit: JointLimit::default(),
            ignore_limits: false,
            child_link: String::new(),
        }
    }

    /// Builder-style limit setter.
    pub fn with_limit(mut self, lower: f64, upper: f64) -> Self {
        self.limit = JointLimit { lower, upper };
        self
    }

    /// Builder-style initial value.
    pub fn with_value(mut self, value: JointValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_child_link(mut self, link: impl Into<String>) -> Self {
        self.child_link = link.into();
        self
    }

    pub fn with_ignore_limits(mut self, ignore: bool) -> Self {
        self.ignore_limits = ignore;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub fn value(&self) -> &JointValue {
        &self.value
    }

    /// Overwrite the joint position.  No limit check happens here.
    pub fn set_value(&mut self, value: JointValue) {
        self.value = value;
    }

    pub fn limit(&self) -> JointLimit {
        self.limit
    }

    pub fn ignore_limits(&self) -> bool {
        self.ignore_limits
    }

    pub fn set_ignore_limits(&mut self, ignore: bool) {
        self.ignore_limits = ignore;
    }

    pub fn child_link(&self) -> &str {
        &self.child_link
    }
}

/// A loaded robot: its joints in declaration order and the names of the
/// scene-graph nodes the renderer created for it.
#[derive(Debug, Clone)]
pub struct Robot {
    name: String,
    joints: Vec<Joint>,
    nodes: Vec<String>,
    world_dirty: bool,
}

impl Robot {
    /// Create an empty robot.  Its name doubles as the root node name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            nodes: vec![name.clone()],
            name,
            joints: Vec::new(),
            world_dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a joint.  A joint with the same name is replaced in place.
    pub fn add_joint(&mut self, joint: Joint) {
        match self.joints.iter_mut().find(|j| j.name == joint.name) {
            Some(existing) => *existing = joint,
            None => self.joints.push(joint),
        }
    }

    /// Record a scene-graph node name.  Duplicates are ignored.
    pub fn add_node(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.nodes.contains(&name) {
            self.nodes.push(name);
        }
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    /// Name of the root scene-graph node.
    pub fn root_node(&self) -> &str {
        &self.name
    }

    /// Node a joint's floating label attaches to: the node named after the
    /// joint, or the robot root when the renderer has no such node.
    pub fn anchor_for(&self, joint_name: &str) -> &str {
        self.nodes
            .iter()
            .find(|n| n.as_str() == joint_name)
            .map(String::as_str)
            .unwrap_or(self.root_node())
    }

    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name == name)
    }

    pub fn joint_mut(&mut self, name: &str) -> Option<&mut Joint> {
        self.joints.iter_mut().find(|j| j.name == name)
    }

    /// All joint names in declaration order.
    pub fn joint_names(&self) -> Vec<String> {
        self.joints.iter().map(|j| j.name.clone()).collect()
    }

    /// Names of the non-fixed joints in declaration order.
    pub fn movable_joint_names(&self) -> Vec<String> {
        self.joints
            .iter()
            .filter(|j| j.joint_type != JointType::Fixed)
            .map(|j| j.name.clone())
            .collect()
    }

    /// Set a joint's value.  Returns `false` for unknown joints.
    pub fn set_joint_value(&mut self, name: &str, value: JointValue) -> bool {
        match self.joint_mut(name) {
            Some(joint) => {
                joint.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Toggle limit enforcement for a joint.  Returns `false` for unknown
    /// joints.
    pub fn set_ignore_limits(&mut self, name: &str, ignore: bool) -> bool {
        match self.joint_mut(name) {
            Some(joint) => {
                joint.set_ignore_limits(ignore);
                true
            }
            None => false,
        }
    }

    /// Flag the world transforms as stale; the next frame flush pushes the
    /// pose to the renderer.
    pub fn mark_world_dirty(&mut self) {
        self.world_dirty = true;
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty
    }

    /// Clear the dirty flag, returning its previous value.
    pub fn take_world_dirty(&mut self) -> bool {
        std::mem::take(&mut self.world_dirty)
    }

    /// Snapshot of every joint position.
    pub fn pose(&self) -> Vec<JointPose> {
        self.joints
            .iter()
            .map(|j| JointPose {
                name: j.name.clone(),
                value: j.value.clone(),
            })
            .collect()
    }
}
