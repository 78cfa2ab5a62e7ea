//! [`TransientAlert`] – a page message that hides itself after a fixed
//! duration.
//!
//! Time is passed in explicitly; the owner calls [`TransientAlert::expire`]
//! on every frame so the hide happens on the first frame past the deadline.
//! Showing again while visible replaces the text and restarts the timer.

use std::time::{Duration, Instant};

use jointview_types::UiSurface;

use crate::page;

/// How long an alert stays up unless configured otherwise.
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_secs(3);

/// Which alert element a message goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Virtual joint reached a URDF limit.
    Joint,
    /// Real servo reported a fault.  Reserved for hardware integration.
    Servo,
}

impl AlertKind {
    pub fn element_id(self) -> &'static str {
        match self {
            AlertKind::Joint => page::JOINT_LIMIT_ALERT,
            AlertKind::Servo => page::SERVO_LIMIT_ALERT,
        }
    }
}

/// Auto-hiding alert bound to one page element.
#[derive(Debug)]
pub struct TransientAlert {
    kind: AlertKind,
    duration: Duration,
    hide_at: Option<Instant>,
}

impl TransientAlert {
    pub fn new(kind: AlertKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            hide_at: None,
        }
    }

    /// Display `message`.  Returns `false` when the page has no element for
    /// this alert kind.
    pub fn show(&mut self, ui: &mut dyn UiSurface, message: &str, now: Instant) -> bool {
        let id = self.kind.element_id();
        if !ui.exists(id) {
            return false;
        }
        ui.set_text(id, message);
        ui.show(id);
        self.hide_at = Some(now + self.duration);
        true
    }

    /// Hide the alert if its deadline has passed.
    pub fn expire(&mut self, ui: &mut dyn UiSurface, now: Instant) {
        if let Some(deadline) = self.hide_at
            && now >= deadline
        {
            ui.hide(self.kind.element_id());
            self.hide_at = None;
        }
    }

    pub fn is_showing(&self) -> bool {
        self.hide_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_types::RecordingUi;

    #[test]
    fn shows_then_hides_after_duration() {
        let mut ui = RecordingUi::new().with_element(page::JOINT_LIMIT_ALERT);
        ui.hide(page::JOINT_LIMIT_ALERT);
        let mut alert = TransientAlert::new(AlertKind::Joint, DEFAULT_ALERT_DURATION);
        let t0 = Instant::now();

        assert!(alert.show(&mut ui, "Joint j1 has reached its limit!", t0));
        assert!(ui.is_visible(page::JOINT_LIMIT_ALERT));
        assert_eq!(
            ui.text(page::JOINT_LIMIT_ALERT),
            Some("Joint j1 has reached its limit!")
        );

        alert.expire(&mut ui, t0 + Duration::from_millis(2999));
        assert!(ui.is_visible(page::JOINT_LIMIT_ALERT));

        alert.expire(&mut ui, t0 + Duration::from_secs(3));
        assert!(!ui.is_visible(page::JOINT_LIMIT_ALERT));
        assert!(!alert.is_showing());
    }

    #[test]
    fn reshow_restarts_timer() {
        let mut ui = RecordingUi::new().with_element(page::JOINT_LIMIT_ALERT);
        let mut alert = TransientAlert::new(AlertKind::Joint, Duration::from_secs(3));
        let t0 = Instant::now();
        alert.show(&mut ui, "a", t0);
        alert.show(&mut ui, "b", t0 + Duration::from_secs(2));
        alert.expire(&mut ui, t0 + Duration::from_secs(4));
        assert!(ui.is_visible(page::JOINT_LIMIT_ALERT));
        assert_eq!(ui.text(page::JOINT_LIMIT_ALERT), Some("b"));
    }

    #[test]
    fn missing_element_is_tolerated() {
        let mut ui = RecordingUi::new();
        let mut alert = TransientAlert::new(AlertKind::Servo, DEFAULT_ALERT_DURATION);
        assert!(!alert.show(&mut ui, "servo fault", Instant::now()));
        assert!(!alert.is_showing());
    }
}
