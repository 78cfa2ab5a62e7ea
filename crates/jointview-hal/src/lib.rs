//! `jointview-hal` – the robot handle.
//!
//! Owns the joint collection that the jog controller writes and the joint
//! monitor observes.
//!
//! # Modules
//!
//! - [`robot`] – [`Robot`][robot::Robot] and [`Joint`][robot::Joint]: an
//!   ordered, name-keyed joint collection with type/limit metadata and a
//!   world-transform dirty flag.
//! - [`urdf`] – builds a [`Robot`][robot::Robot] from a URDF document via
//!   `urdf-rs`, and the `/URDF/{model}.urdf` asset path contract.
//! - [`report`] – human-readable joint limit report logged after loading.
//! - [`sim`] – [`SimRobot`][sim::SimRobot] builder for headless tests.

pub mod report;
pub mod robot;
pub mod sim;
pub mod urdf;

pub use robot::{Joint, Robot};
pub use sim::SimRobot;
