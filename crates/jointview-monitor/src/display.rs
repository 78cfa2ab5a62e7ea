//! Page elements owned by the monitor.
//!
//! The monitoring panel is a fixed container in the top-right corner with
//! one entry per joint.  Each joint also gets a floating label anchored to
//! its scene-graph node.

use jointview_types::{AlertFlags, ElementKind, ElementSpec, SensorRecord, Status, UiSurface};

use crate::sensor;

pub const PANEL_ID: &str = "joint-monitoring-panel";
pub const PANEL_HEADER_ID: &str = "joint-monitoring-header";
pub const PANEL_TITLE: &str = "关节监控系统";
/// Style sheet ids live outside every per-joint id namespace.
pub const LABEL_STYLES_ID: &str = "jointview-label-styles";
pub const PANEL_STYLES_ID: &str = "jointview-monitoring-styles";

/// Label position relative to its anchor node, in model units.
pub const LABEL_OFFSET: [f32; 3] = [0.0, 0.1, 0.0];

const LABEL_CSS: &str = "\
.joint-label { border: 1px solid transparent; white-space: pre-line; }
.joint-label.normal { border-color: #4CAF50; }
.joint-label.warning { border-color: #FFC107; }
.joint-label.critical { border-color: #F44336; animation: labelBlink 1s infinite; }
@keyframes labelBlink {
  0%, 100% { background: rgba(244, 67, 54, 0.8); }
  50% { background: rgba(244, 67, 54, 0.4); }
}
";

const PANEL_CSS: &str = "\
.status-normal { background-color: green; }
.status-warning { background-color: yellow; }
.status-critical { background-color: red; }
.temp-value::before { content: \"温度: \"; }
.humidity-value::before { content: \"湿度: \"; }
.pressure-value::before { content: \"压力: \"; }
@keyframes blink {
  0%, 100% { opacity: 1; }
  50% { opacity: 0.3; }
}
.blink { animation: blink 1s infinite; }
";

pub fn entry_id(joint: &str) -> String {
    format!("joint-info-{joint}")
}

pub fn entry_title_id(joint: &str) -> String {
    format!("joint-name-{joint}")
}

pub fn temperature_id(joint: &str) -> String {
    format!("temp-value-{joint}")
}

pub fn humidity_id(joint: &str) -> String {
    format!("humidity-value-{joint}")
}

pub fn pressure_id(joint: &str) -> String {
    format!("pressure-value-{joint}")
}

pub fn indicator_id(joint: &str) -> String {
    format!("status-indicator-{joint}")
}

pub fn label_id(joint: &str) -> String {
    format!("joint-label-{joint}")
}

/// Class of the status dot for `status`.
pub fn indicator_class(status: Status) -> String {
    let mut class = format!("status-indicator status-{status}");
    if status == Status::Critical {
        class.push_str(" blink");
    }
    class
}

/// Class of the floating label for `status`.
pub fn label_class(status: Status) -> String {
    format!("joint-label {status}")
}

/// Multi-line label text: name, status, then any breaches.
pub fn label_text(joint: &str, record: &SensorRecord, flags: AlertFlags) -> String {
    let breaches = sensor::label_breaches(record, flags);
    if breaches.is_empty() {
        format!("{joint}\n{}", record.status)
    } else {
        format!("{joint}\n{}\n{breaches}", record.status)
    }
}

fn temperature_text(value: f64) -> String {
    format!("{value:.1}°C")
}

fn humidity_text(value: f64) -> String {
    format!("{value:.1}%")
}

fn pressure_text(value: f64) -> String {
    format!("{value:.1}hPa")
}

// ────────────────────────────────────────────────────────────────────────────
// Creation
// ────────────────────────────────────────────────────────────────────────────

pub fn create_panel(ui: &mut dyn UiSurface) {
    ui.create(ElementSpec::new(PANEL_ID, ElementKind::Container));
    ui.create(
        ElementSpec::new(PANEL_HEADER_ID, ElementKind::Heading)
            .under(PANEL_ID)
            .with_text(PANEL_TITLE),
    );
}

pub fn install_label_styles(ui: &mut dyn UiSurface) {
    if !ui.exists(LABEL_STYLES_ID) {
        ui.create(ElementSpec::new(
            LABEL_STYLES_ID,
            ElementKind::StyleSheet {
                css: LABEL_CSS.to_string(),
            },
        ));
    }
}

fn install_panel_styles(ui: &mut dyn UiSurface) {
    if !ui.exists(PANEL_STYLES_ID) {
        ui.create(ElementSpec::new(
            PANEL_STYLES_ID,
            ElementKind::StyleSheet {
                css: PANEL_CSS.to_string(),
            },
        ));
    }
}

/// Floating label for `joint`, attached to scene node `anchor`.
pub fn create_label(ui: &mut dyn UiSurface, joint: &str, anchor: &str) {
    ui.create(
        ElementSpec::new(
            label_id(joint),
            ElementKind::Label {
                anchor: anchor.to_string(),
                offset: LABEL_OFFSET,
            },
        )
        .with_class(label_class(Status::Normal)),
    );
}

/// Panel entry for `joint`, initialised to the default readings.
pub fn create_entry(ui: &mut dyn UiSurface, joint: &str) {
    let entry = entry_id(joint);
    let initial = SensorRecord::default();

    ui.create(
        ElementSpec::new(entry.clone(), ElementKind::Container)
            .under(PANEL_ID)
            .with_class("joint-info"),
    );
    ui.create(
        ElementSpec::new(entry_title_id(joint), ElementKind::Heading)
            .under(entry.clone())
            .with_text(joint),
    );
    ui.create(
        ElementSpec::new(indicator_id(joint), ElementKind::Indicator)
            .under(entry.clone())
            .with_class(indicator_class(Status::Normal)),
    );
    ui.create(
        ElementSpec::new(temperature_id(joint), ElementKind::Text)
            .under(entry.clone())
            .with_class("temp-value")
            .with_text(temperature_text(initial.temperature)),
    );
    ui.create(
        ElementSpec::new(humidity_id(joint), ElementKind::Text)
            .under(entry.clone())
            .with_class("humidity-value")
            .with_text(humidity_text(initial.humidity)),
    );
    ui.create(
        ElementSpec::new(pressure_id(joint), ElementKind::Text)
            .under(entry)
            .with_class("pressure-value")
            .with_text(pressure_text(initial.pressure)),
    );

    install_panel_styles(ui);
}

// ────────────────────────────────────────────────────────────────────────────
// Updates
// ────────────────────────────────────────────────────────────────────────────

/// Write `record` into the joint's panel entry.
pub fn reflect_entry(ui: &mut dyn UiSurface, joint: &str, record: &SensorRecord) {
    ui.set_text(&temperature_id(joint), &temperature_text(record.temperature));
    ui.set_text(&humidity_id(joint), &humidity_text(record.humidity));
    ui.set_text(&pressure_id(joint), &pressure_text(record.pressure));
    ui.set_class(&indicator_id(joint), &indicator_class(record.status));
}

/// Write `record` into the joint's floating label.
pub fn reflect_label(ui: &mut dyn UiSurface, joint: &str, record: &SensorRecord, flags: AlertFlags) {
    let id = label_id(joint);
    ui.set_text(&id, &label_text(joint, record, flags));
    ui.set_class(&id, &label_class(record.status));
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_types::RecordingUi;

    #[test]
    fn indicator_blinks_only_when_critical() {
        assert_eq!(indicator_class(Status::Normal), "status-indicator status-normal");
        assert_eq!(indicator_class(Status::Warning), "status-indicator status-warning");
        assert_eq!(
            indicator_class(Status::Critical),
            "status-indicator status-critical blink"
        );
    }

    #[test]
    fn entry_starts_at_defaults_and_installs_styles_once() {
        let mut ui = RecordingUi::new();
        create_panel(&mut ui);
        create_entry(&mut ui, "joint1");
        create_entry(&mut ui, "joint2");

        assert_eq!(ui.text(&temperature_id("joint1")), Some("25.0°C"));
        assert_eq!(ui.text(&humidity_id("joint1")), Some("40.0%"));
        assert_eq!(ui.text(&pressure_id("joint1")), Some("1013.0hPa"));
        assert_eq!(ui.text(PANEL_HEADER_ID), Some(PANEL_TITLE));
        assert_eq!(
            ui.created().iter().filter(|id| *id == PANEL_STYLES_ID).count(),
            1
        );
        assert_eq!(
            ui.element(&entry_id("joint2")).and_then(|e| e.parent.as_deref()),
            Some(PANEL_ID)
        );
    }

    #[test]
    fn label_is_anchored_with_offset() {
        let mut ui = RecordingUi::new();
        create_label(&mut ui, "joint1", "link1");
        let element = ui.element(&label_id("joint1")).unwrap();
        assert_eq!(
            element.kind,
            ElementKind::Label {
                anchor: "link1".into(),
                offset: LABEL_OFFSET
            }
        );
        assert_eq!(element.class, "joint-label normal");
    }

    #[test]
    fn label_text_lists_breaches_on_third_line() {
        let record = SensorRecord {
            humidity: 72.0,
            status: Status::Critical,
            ..SensorRecord::default()
        };
        let flags = AlertFlags {
            humidity: true,
            ..AlertFlags::default()
        };
        assert_eq!(label_text("j", &record, flags), "j\ncritical\n湿: 72.0%");
        assert_eq!(
            label_text("j", &SensorRecord::default(), AlertFlags::default()),
            "j\nnormal"
        );
    }
}
