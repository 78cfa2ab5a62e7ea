//! `jointview-cockpit` – the browser bridge.
//!
//! Boots a lightweight HTTP + WebSocket server (default port `8080`) that:
//!
//! 1. **Serves** the viewer page, its scene settings (`/scene.json`) and
//!    the robot assets under `/URDF/`.
//!
//! 2. **Bridges** the [`EventBus`] scene and UI topics to every connected
//!    browser tab so DOM patches, joint poses and stage resizes reach the
//!    renderer.
//!
//! 3. **Accepts** upstream `/input/*` messages from the browser and
//!    publishes them as [`InputEvent`]s on the input topic.
//!
//! [`EventBus`]: jointview_middleware::EventBus
//! [`InputEvent`]: jointview_types::InputEvent

pub mod server;

pub use server::{CockpitServer, DEFAULT_PORT, SceneSettings};
