//! Joint limit check applied before every jog step.
//!
//! A candidate value passes when:
//! - the joint is `continuous` or `fixed`,
//! - the joint is flagged to ignore its limits,
//! - the value is multi-DOF (no per-axis limits are modelled), or
//! - the scalar value lies in `[lower, upper]`, bounds inclusive.

use std::fmt;

use jointview_hal::Joint;
use jointview_types::{JointLimit, JointValue};

/// A rejected jog step.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitViolation {
    pub joint: String,
    pub candidate: f64,
    pub limit: JointLimit,
}

impl fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Joint {} would exceed its limits. Movement prevented.",
            self.joint
        )
    }
}

/// Validate `candidate` against `joint`'s URDF limits.
pub fn check(joint: &Joint, candidate: &JointValue) -> Result<(), LimitViolation> {
    if joint.joint_type().is_unbounded() || joint.ignore_limits() {
        return Ok(());
    }
    match candidate {
        JointValue::Multi(_) => Ok(()),
        JointValue::Scalar(value) => {
            let limit = joint.limit();
            if limit.contains(*value) {
                Ok(())
            } else {
                Err(LimitViolation {
                    joint: joint.name().to_string(),
                    candidate: *value,
                    limit,
                })
            }
        }
    }
}
