//! URDF loading.
//!
//! Parsing is delegated to `urdf-rs`; this module only maps the parsed
//! document onto a [`Robot`]: joints in declaration order with their limits,
//! and one scene-graph node per link and per joint (mirroring the node
//! layout the browser-side loader creates).

use std::path::{Path, PathBuf};

use jointview_types::{JointType, ViewError};
use tracing::info;

use crate::robot::{Joint, Robot};

/// Model loaded when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "genkiarm";

/// URL path under which the viewer fetches a model's URDF.
pub fn asset_path(model: &str) -> String {
    format!("/URDF/{model}.urdf")
}

/// Location of a model's URDF inside the asset directory.
pub fn asset_file(urdf_dir: &Path, model: &str) -> PathBuf {
    urdf_dir.join(format!("{model}.urdf"))
}

/// Read and parse a URDF file.
///
/// # Errors
///
/// Returns [`ViewError::UrdfLoad`] when the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<Robot, ViewError> {
    let xml = std::fs::read_to_string(path).map_err(|e| ViewError::UrdfLoad {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    let robot = from_str(&xml, &path.display().to_string())?;
    info!(
        robot = robot.name(),
        joints = robot.joint_count(),
        path = %path.display(),
        "URDF loaded"
    );
    Ok(robot)
}

/// Parse a URDF document.  `origin` only labels errors.
///
/// # Errors
///
/// Returns [`ViewError::UrdfLoad`] when `urdf-rs` rejects the document.
pub fn from_str(xml: &str, origin: &str) -> Result<Robot, ViewError> {
    let urdf = urdf_rs::read_from_string(xml).map_err(|e| ViewError::UrdfLoad {
        path: origin.to_string(),
        details: e.to_string(),
    })?;
    Ok(from_urdf(&urdf))
}

/// Map a parsed URDF onto a [`Robot`].
pub fn from_urdf(urdf: &urdf_rs::Robot) -> Robot {
    let mut robot = Robot::new(urdf.name.clone());
    for link in &urdf.links {
        robot.add_node(link.name.clone());
    }
    for joint in &urdf.joints {
        let joint_type = map_joint_type(&joint.joint_type);
        robot.add_joint(
            Joint::new(joint.name.clone(), joint_type)
                .with_limit(joint.limit.lower, joint.limit.upper)
                .with_child_link(joint.child.link.clone()),
        );
        robot.add_node(joint.name.clone());
    }
    robot
}

fn map_joint_type(joint_type: &urdf_rs::JointType) -> JointType {
    match joint_type {
        urdf_rs::JointType::Revolute => JointType::Revolute,
        urdf_rs::JointType::Continuous => JointType::Continuous,
        urdf_rs::JointType::Prismatic => JointType::Prismatic,
        urdf_rs::JointType::Fixed => JointType::Fixed,
        urdf_rs::JointType::Floating => JointType::Floating,
        urdf_rs::JointType::Planar => JointType::Planar,
        urdf_rs::JointType::Spherical => JointType::Spherical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_types::JointValue;

    const MINI_ARM: &str = r#"<?xml version="1.0"?>
<robot name="mini_arm">
  <link name="base_link"/>
  <link name="upper_link"/>
  <link name="lower_link"/>
  <link name="tool_link"/>
  <joint name="mount" type="fixed">
    <parent link="base_link"/>
    <child link="upper_link"/>
  </joint>
  <joint name="shoulder" type="revolute">
    <parent link="upper_link"/>
    <child link="lower_link"/>
    <axis xyz="0 0 1"/>
    <limit lower="-1.57" upper="1.57" effort="10" velocity="1"/>
  </joint>
  <joint name="spin" type="continuous">
    <parent link="lower_link"/>
    <child link="tool_link"/>
    <axis xyz="0 0 1"/>
  </joint>
</robot>
"#;

    #[test]
    fn parses_joints_in_declaration_order() {
        let robot = from_str(MINI_ARM, "inline").unwrap();
        assert_eq!(robot.name(), "mini_arm");
        assert_eq!(robot.joint_names(), vec!["mount", "shoulder", "spin"]);
        assert_eq!(robot.movable_joint_names(), vec!["shoulder", "spin"]);
    }

    #[test]
    fn maps_types_limits_and_child_links() {
        let robot = from_str(MINI_ARM, "inline").unwrap();
        let shoulder = robot.joint("shoulder").unwrap();
        assert_eq!(shoulder.joint_type(), JointType::Revolute);
        assert!((shoulder.limit().lower + 1.57).abs() < 1e-9);
        assert!((shoulder.limit().upper - 1.57).abs() < 1e-9);
        assert_eq!(shoulder.child_link(), "lower_link");
        assert_eq!(shoulder.value(), &JointValue::Scalar(0.0));
        assert_eq!(robot.joint("spin").unwrap().joint_type(), JointType::Continuous);
    }

    #[test]
    fn joints_and_links_become_nodes() {
        let robot = from_str(MINI_ARM, "inline").unwrap();
        assert!(robot.has_node("tool_link"));
        assert_eq!(robot.anchor_for("shoulder"), "shoulder");
    }

    #[test]
    fn malformed_document_is_urdf_load_error() {
        let err = from_str("<robot", "broken.urdf").unwrap_err();
        assert!(matches!(err, ViewError::UrdfLoad { ref path, .. } if path == "broken.urdf"));
    }

    #[test]
    fn load_file_reads_from_asset_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = asset_file(dir.path(), "mini_arm");
        std::fs::write(&path, MINI_ARM).unwrap();
        let robot = load_file(&path).unwrap();
        assert_eq!(robot.joint_count(), 3);
    }

    #[test]
    fn load_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = asset_file(dir.path(), "absent");
        assert!(matches!(load_file(&path), Err(ViewError::UrdfLoad { .. })));
    }

    #[test]
    fn asset_path_follows_url_pattern() {
        assert_eq!(asset_path(DEFAULT_MODEL), "/URDF/genkiarm.urdf");
    }
}
