//! `jointview-monitor` – simulated per-joint health monitoring.
//!
//! # Modules
//!
//! - [`monitor`] – [`JointMonitor`][monitor::JointMonitor]: owns one sensor
//!   record per joint and runs the simulate → classify → reflect → log pass.
//! - [`sensor`] – random-walk simulation, threshold classification and the
//!   alert texts.
//! - [`display`] – element ids and creation of the monitoring panel and the
//!   floating joint labels.

pub mod display;
pub mod monitor;
pub mod sensor;

pub use monitor::{DEFAULT_TICK_INTERVAL, JointHealth, JointMonitor, MonitorConfig, TickReport};
