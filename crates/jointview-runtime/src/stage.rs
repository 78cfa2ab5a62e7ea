//! [`Stage`] – viewport model shared with the renderer.
//!
//! The renderer draws into two stacked surfaces (WebGL canvas and the CSS
//! label layer) seen through one perspective camera.  The stage keeps the
//! authoritative sizes on the Rust side and hands the renderer a
//! [`EventPayload::StageResized`] whenever they change.

use jointview_types::EventPayload;
use tracing::debug;

/// Pixel size of one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub aspect: f64,
    /// Set when `aspect` changed and the projection matrix must be rebuilt.
    pub projection_dirty: bool,
}

#[derive(Debug, Clone)]
pub struct Stage {
    render: Surface,
    labels: Surface,
    pixel_ratio: f64,
    camera: Camera,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

impl Stage {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        let surface = Surface { width, height };
        let aspect = if height == 0 {
            1.0
        } else {
            f64::from(width) / f64::from(height)
        };
        Self {
            render: surface,
            labels: surface,
            pixel_ratio,
            camera: Camera {
                aspect,
                projection_dirty: false,
            },
        }
    }

    pub fn render_surface(&self) -> Surface {
        self.render
    }

    pub fn label_surface(&self) -> Surface {
        self.labels
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Adopt a new window size.  Both surfaces follow and the camera aspect
    /// becomes `width / height`.  A zero height is ignored; returns whether
    /// the stage changed.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) -> bool {
        if height == 0 {
            debug!(width, "Ignoring resize to zero height");
            return false;
        }
        let surface = Surface { width, height };
        self.render = surface;
        self.labels = surface;
        if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            self.pixel_ratio = pixel_ratio;
        }
        self.camera.aspect = f64::from(width) / f64::from(height);
        self.camera.projection_dirty = true;
        true
    }

    /// The renderer-facing description of the current stage.
    pub fn payload(&self) -> EventPayload {
        EventPayload::StageResized {
            width: self.render.width,
            height: self.render.height,
            pixel_ratio: self.pixel_ratio,
            aspect: self.camera.aspect,
        }
    }

    /// Take the pending projection update, if any, as a payload for the
    /// renderer.
    pub fn flush(&mut self) -> Option<EventPayload> {
        if !self.camera.projection_dirty {
            return None;
        }
        self.camera.projection_dirty = false;
        Some(self.payload())
    }
}
