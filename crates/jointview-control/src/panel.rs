//! [`ControlPanel`] – click handling for the control panel chrome.
//!
//! Covers the collapse/expand buttons, the collapsible sections and the
//! device connection buttons.  Every element lookup goes through
//! [`UiSurface::exists`] so a page that ships only part of the panel still
//! works.

use std::collections::HashSet;

use jointview_types::UiSurface;
use tracing::info;

use crate::page;

/// How a click was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    /// The click changed the panel.
    Handled,
    /// The click targeted a feature that does not exist yet.
    NotImplemented(&'static str),
    /// Not a panel element.
    Ignored,
}

#[derive(Debug, Default)]
pub struct ControlPanel {
    collapsed: bool,
    open_sections: HashSet<String>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialise the speed read-out from the slider value.
    pub fn setup(&mut self, ui: &mut dyn UiSurface, speed_deg: f64) {
        if ui.exists(page::SPEED_VALUE) {
            ui.set_text(page::SPEED_VALUE, &format!("{speed_deg:.1}"));
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_open(&self, section: &str) -> bool {
        self.open_sections.contains(section)
    }

    /// Dispatch a click on element `id`.
    pub fn click(&mut self, id: &str, ui: &mut dyn UiSurface) -> PanelOutcome {
        match id {
            page::HIDE_CONTROLS => {
                self.set_collapsed(true, ui);
                PanelOutcome::Handled
            }
            page::TOGGLE_PANEL => {
                self.set_collapsed(false, ui);
                PanelOutcome::Handled
            }
            page::CONNECT_JOYCON => Self::not_implemented("Joycon", ui),
            page::CONNECT_VR => Self::not_implemented("VR", ui),
            _ => match section_for_header(id) {
                Some(section) => {
                    self.toggle_section(section, ui);
                    PanelOutcome::Handled
                }
                None => PanelOutcome::Ignored,
            },
        }
    }

    fn set_collapsed(&mut self, collapsed: bool, ui: &mut dyn UiSurface) {
        self.collapsed = collapsed;
        let (hide, show) = if collapsed {
            (page::CONTROL_PANEL, page::TOGGLE_PANEL)
        } else {
            (page::TOGGLE_PANEL, page::CONTROL_PANEL)
        };
        if ui.exists(hide) {
            ui.hide(hide);
        }
        if ui.exists(show) {
            ui.show(show);
        }
    }

    fn toggle_section(&mut self, section: &'static str, ui: &mut dyn UiSurface) {
        let open = if self.open_sections.remove(section) {
            false
        } else {
            self.open_sections.insert(section.to_string());
            true
        };
        if ui.exists(section) {
            let class = if open {
                format!("{} open", page::COLLAPSIBLE_CLASS)
            } else {
                page::COLLAPSIBLE_CLASS.to_string()
            };
            ui.set_class(section, &class);
        }
    }

    fn not_implemented(device: &'static str, ui: &mut dyn UiSurface) -> PanelOutcome {
        info!("{device} connection not yet implemented");
        ui.notify(&format!(
            "{device} connection will be implemented in the future."
        ));
        PanelOutcome::NotImplemented(device)
    }
}

fn section_for_header(id: &str) -> Option<&'static str> {
    page::SECTIONS
        .iter()
        .copied()
        .find(|section| page::section_header(section) == id)
}
