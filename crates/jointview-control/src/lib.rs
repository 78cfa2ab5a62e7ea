//! `jointview-control` – keyboard jogging and the control panel.
//!
//! # Modules
//!
//! - [`jog`] – [`JogController`][jog::JogController]: advances held-key
//!   joints by one step per frame, rejecting moves that leave the URDF
//!   limits.
//! - [`limits`] – the joint limit check and the violation it reports.
//! - [`keymap`] – the static key → (joint index, direction) table.
//! - [`alert`] – [`TransientAlert`][alert::TransientAlert]: a message
//!   element that hides itself after a fixed duration.
//! - [`activity`] – [`ActivityHighlight`][activity::ActivityHighlight]:
//!   debounced "section active" styling.
//! - [`panel`] – [`ControlPanel`][panel::ControlPanel]: collapse/expand,
//!   collapsible sections and the hardware connection stubs.
//! - [`page`] – element identifiers of the viewer page.

pub mod activity;
pub mod alert;
pub mod jog;
pub mod keymap;
pub mod limits;
pub mod page;
pub mod panel;

pub use alert::{AlertKind, TransientAlert};
pub use jog::{ControlMode, FrameOutcome, JogConfig, JogController};
pub use keymap::{KeyBinding, KeyMap};
pub use panel::{ControlPanel, PanelOutcome};
