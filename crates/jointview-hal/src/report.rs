//! Joint limit report printed once the robot is loaded.

use jointview_types::JointType;
use tracing::info;

use crate::robot::Robot;

/// Build the report lines for every joint, in declaration order.
pub fn joint_limit_report(robot: &Robot) -> Vec<String> {
    let mut lines = vec!["Robot joint limits:".to_string()];
    for joint in robot.joints() {
        lines.push(format!("Joint: {}", joint.name()));
        lines.push(format!("  Type: {}", joint.joint_type()));
        match joint.joint_type() {
            JointType::Fixed => lines.push("  No limits (fixed joint)".to_string()),
            JointType::Continuous => lines.push("  No limits (continuous joint)".to_string()),
            _ => {
                let limit = joint.limit();
                lines.push(format!(
                    "  Limits: {:.4} to {:.4} rad ({:.2}° to {:.2}°)",
                    limit.lower,
                    limit.upper,
                    limit.lower.to_degrees(),
                    limit.upper.to_degrees()
                ));
                lines.push(format!("  Current value: {}", joint.value()));
            }
        }
    }
    lines
}

/// Emit [`joint_limit_report`] through `tracing`.
pub fn log_joint_limits(robot: &Robot) {
    for line in joint_limit_report(robot) {
        info!(target: "jointview_hal::report", "{line}");
    }
}
