//! `jointview-middleware` – routes events between the scene loop and the
//! browser bridge.
//!
//! # Modules
//!
//! - [`bus`] – topic-based publish/subscribe event bus built on Tokio
//!   broadcast channels.
//! - [`bus_ui`] – [`BusUi`][bus_ui::BusUi]: a
//!   [`UiSurface`][jointview_types::UiSurface] that mirrors the page state
//!   and publishes every change as a [`UiPatch`][jointview_types::UiPatch].

pub mod bus;
pub mod bus_ui;

pub use bus::{EventBus, Topic, TopicReceiver};
pub use bus_ui::BusUi;
