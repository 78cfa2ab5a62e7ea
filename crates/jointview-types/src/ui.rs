//! The UI adapter seam.
//!
//! Jog and monitor logic never touch the DOM directly.  They talk to a
//! [`UiSurface`], which the browser bridge implements by emitting
//! [`UiPatch`] events and which tests implement with [`RecordingUi`].
//!
//! Every mutating call on an unknown element id is a silent no-op.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What kind of element to create on the viewer page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// A block-level container (`div`).
    Container,
    /// A heading line.
    Heading,
    /// A span holding a readout.
    Text,
    /// A round status dot.
    Indicator,
    /// A label attached to a scene-graph node, following it in screen space.
    Label { anchor: String, offset: [f32; 3] },
    /// A `<style>` block installed in the document head.
    StyleSheet { css: String },
}

/// Description of an element to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub id: String,
    /// Parent element id; `None` attaches to the document body (or head for
    /// style sheets).
    pub parent: Option<String>,
    pub kind: ElementKind,
    pub class: String,
    pub text: String,
}

impl ElementSpec {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            parent: None,
            kind,
            class: String::new(),
            text: String::new(),
        }
    }

    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// A single DOM mutation, serialised to the viewer page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UiPatch {
    Create { element: ElementSpec },
    SetText { id: String, text: String },
    SetClass { id: String, class: String },
    Show { id: String },
    Hide { id: String },
    /// A blocking user notification (`window.alert` on the page).
    Notify { message: String },
}

/// Capability set the control and monitor logic need from a page.
pub trait UiSurface {
    /// `true` if an element with `id` exists on the page.
    fn exists(&self, id: &str) -> bool;

    /// Create an element.  Re-creating an existing id is a no-op.
    fn create(&mut self, element: ElementSpec);

    fn set_text(&mut self, id: &str, text: &str);

    /// Replace the element's full class list.
    fn set_class(&mut self, id: &str, class: &str);

    fn show(&mut self, id: &str);

    fn hide(&mut self, id: &str);

    /// Show a blocking notification to the user.
    fn notify(&mut self, _message: &str) {}

    /// Push the complete current page state again, e.g. after the renderer
    /// reconnected.
    fn resync(&mut self) {}
}

// ────────────────────────────────────────────────────────────────────────────
// RecordingUi
// ────────────────────────────────────────────────────────────────────────────

/// State of one element held by [`RecordingUi`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub parent: Option<String>,
    pub kind: ElementKind,
    pub class: String,
    pub text: String,
    pub visible: bool,
}

/// In-memory [`UiSurface`] that remembers the resulting page state.
///
/// Used by tests across the workspace and by headless runs where no
/// browser is attached.
#[derive(Debug, Default)]
pub struct RecordingUi {
    elements: HashMap<String, ElementState>,
    order: Vec<String>,
    notifications: Vec<String>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a static page element (builder-style).
    pub fn with_element(mut self, id: &str) -> Self {
        self.create(ElementSpec::new(id, ElementKind::Container));
        self
    }

    /// Pre-populate several static page elements (builder-style).
    pub fn with_elements(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.create(ElementSpec::new(*id, ElementKind::Container));
        }
        self
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    pub fn class(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.class.as_str())
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    /// Element ids in creation order.
    pub fn created(&self) -> &[String] {
        &self.order
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }
}

impl UiSurface for RecordingUi {
    fn exists(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn create(&mut self, element: ElementSpec) {
        if self.elements.contains_key(&element.id) {
            return;
        }
        self.order.push(element.id.clone());
        self.elements.insert(
            element.id,
            ElementState {
                parent: element.parent,
                kind: element.kind,
                class: element.class,
                text: element.text,
                visible: true,
            },
        );
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.text = text.to_string();
        }
    }

    fn set_class(&mut self, id: &str, class: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.class = class.to_string();
        }
    }

    fn show(&mut self, id: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.visible = true;
        }
    }

    fn hide(&mut self, id: &str) {
        if let Some(e) = self.elements.get_mut(id) {
            e.visible = false;
        }
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
