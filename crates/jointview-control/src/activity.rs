//! [`ActivityHighlight`] – debounced "section active" styling.
//!
//! Every [`touch`][ActivityHighlight::touch] marks the keyboard control
//! section active and pushes the deactivation deadline out by the full
//! window, so a steady stream of key activity keeps it lit.

use std::time::{Duration, Instant};

use jointview_types::UiSurface;

use crate::page;

/// Default inactivity window before the highlight drops.
pub const DEFAULT_HIGHLIGHT_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct ActivityHighlight {
    window: Duration,
    active_until: Option<Instant>,
}

impl ActivityHighlight {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            active_until: None,
        }
    }

    /// Record activity at `now`.
    pub fn touch(&mut self, ui: &mut dyn UiSurface, now: Instant) {
        if !ui.exists(page::KEYBOARD_SECTION) {
            return;
        }
        if self.active_until.is_none() {
            ui.set_class(
                page::KEYBOARD_SECTION,
                &format!("{} control-active", page::SECTION_CLASS),
            );
        }
        self.active_until = Some(now + self.window);
    }

    /// Drop the highlight once the window has elapsed without activity.
    pub fn expire(&mut self, ui: &mut dyn UiSurface, now: Instant) {
        if let Some(until) = self.active_until
            && now >= until
        {
            ui.set_class(page::KEYBOARD_SECTION, page::SECTION_CLASS);
            self.active_until = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_until.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_types::RecordingUi;

    fn ui() -> RecordingUi {
        RecordingUi::new().with_element(page::KEYBOARD_SECTION)
    }

    #[test]
    fn touch_activates_and_expires() {
        let mut ui = ui();
        let mut hl = ActivityHighlight::new(DEFAULT_HIGHLIGHT_WINDOW);
        let t0 = Instant::now();
        hl.touch(&mut ui, t0);
        assert_eq!(
            ui.class(page::KEYBOARD_SECTION),
            Some("control-section control-active")
        );
        hl.expire(&mut ui, t0 + Duration::from_secs(2));
        assert_eq!(ui.class(page::KEYBOARD_SECTION), Some("control-section"));
        assert!(!hl.is_active());
    }

    #[test]
    fn repeated_activity_extends_window() {
        let mut ui = ui();
        let mut hl = ActivityHighlight::new(DEFAULT_HIGHLIGHT_WINDOW);
        let t0 = Instant::now();
        hl.touch(&mut ui, t0);
        hl.touch(&mut ui, t0 + Duration::from_millis(1500));
        hl.expire(&mut ui, t0 + Duration::from_millis(2500));
        assert!(hl.is_active());
        hl.expire(&mut ui, t0 + Duration::from_millis(3500));
        assert!(!hl.is_active());
    }

    #[test]
    fn missing_section_is_noop() {
        let mut ui = RecordingUi::new();
        let mut hl = ActivityHighlight::new(DEFAULT_HIGHLIGHT_WINDOW);
        hl.touch(&mut ui, Instant::now());
        assert!(!hl.is_active());
    }
}
