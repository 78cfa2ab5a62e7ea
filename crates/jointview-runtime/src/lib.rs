//! `jointview-runtime` – the scene loop and process-level plumbing.
//!
//! # Modules
//!
//! - [`scene_loop`] – [`SceneLoop`]: owns the robot, runs the frame and
//!   monitor drivers and applies browser input.
//! - [`stage`] – [`Stage`]: render surface, label surface and camera aspect.
//! - [`telemetry`] – `tracing` subscriber with optional OTLP export.

pub mod scene_loop;
pub mod stage;
pub mod telemetry;

pub use scene_loop::{DEFAULT_FRAME_RATE_HZ, SceneConfig, SceneLoop};
pub use stage::{Camera, Stage, Surface};
