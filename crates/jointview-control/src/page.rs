//! Identifiers of the static elements on the viewer page.
//!
//! The page may omit any of them; every consumer checks
//! [`UiSurface::exists`][jointview_types::UiSurface::exists] first.

pub const SPEED_CONTROL: &str = "speedControl";
pub const SPEED_VALUE: &str = "speedValue";
pub const CONTROL_PANEL: &str = "controlPanel";
pub const TOGGLE_PANEL: &str = "togglePanel";
pub const HIDE_CONTROLS: &str = "hideControls";
pub const KEYBOARD_SECTION: &str = "keyboardControlSection";
pub const JOINT_LIMIT_ALERT: &str = "jointLimitAlert";
pub const SERVO_LIMIT_ALERT: &str = "servoLimitAlert";
pub const CONNECT_JOYCON: &str = "connectJoycon";
pub const CONNECT_VR: &str = "connectVR";

/// Base class of the keyboard control section.
pub const SECTION_CLASS: &str = "control-section";
/// Base class of a collapsible section.
pub const COLLAPSIBLE_CLASS: &str = "collapsible";

/// Collapsible sections shipped with the page.
pub const SECTIONS: &[&str] = &["section-keyboard", "section-speed", "section-devices"];

/// Element id of the on-screen indicator for `key`.
pub fn key_indicator(key: &str) -> String {
    format!("key-{key}")
}

/// Header id of a collapsible section.
pub fn section_header(section: &str) -> String {
    format!("{section}-header")
}

/// Every static element id the page ships with.
pub fn static_elements() -> Vec<String> {
    let mut ids: Vec<String> = [
        SPEED_CONTROL,
        SPEED_VALUE,
        CONTROL_PANEL,
        TOGGLE_PANEL,
        HIDE_CONTROLS,
        KEYBOARD_SECTION,
        JOINT_LIMIT_ALERT,
        SERVO_LIMIT_ALERT,
        CONNECT_JOYCON,
        CONNECT_VR,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for section in SECTIONS {
        ids.push(section.to_string());
        ids.push(section_header(section));
    }
    for key in crate::keymap::KeyMap::default().keys() {
        ids.push(key_indicator(key));
    }
    ids
}
