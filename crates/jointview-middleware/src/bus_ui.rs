//! [`BusUi`] – the browser-facing [`UiSurface`].
//!
//! Every accepted mutation is published on [`Topic::Ui`] as an
//! [`EventPayload::Ui`] patch.  `BusUi` also keeps a mirror of what it has
//! sent so that [`exists`][UiSurface::exists] answers locally and a page
//! that connects late can be brought up to date with
//! [`snapshot`][BusUi::snapshot].
//!
//! Publishing while no page is connected is not an error; the mirror still
//! records the change.

use std::collections::HashMap;

use jointview_types::{ElementSpec, Event, EventPayload, UiPatch, UiSurface};
use tracing::trace;

use crate::bus::{EventBus, Topic};

const SOURCE: &str = "jointview-middleware::bus_ui";

#[derive(Debug, Default)]
struct Mirror {
    /// `None` for elements that ship with the page.
    spec: Option<ElementSpec>,
    text: Option<String>,
    class: Option<String>,
    visible: Option<bool>,
}

pub struct BusUi {
    bus: EventBus,
    elements: HashMap<String, Mirror>,
    order: Vec<String>,
}

impl BusUi {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            elements: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register elements the page ships with (builder-style).
    pub fn with_static_elements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !self.elements.contains_key(&id) {
                self.order.push(id.clone());
                self.elements.insert(id, Mirror::default());
            }
        }
        self
    }

    fn publish(&self, patch: UiPatch) {
        if let Err(e) = self
            .bus
            .publish_to(Topic::Ui, Event::new(SOURCE, EventPayload::Ui(patch)))
        {
            trace!(error = %e, "UI patch not delivered");
        }
    }

    /// Patches that rebuild the current page state from scratch.
    ///
    /// Dynamic elements are re-created with their latest text and class;
    /// static elements only replay what was changed since start-up.
    pub fn snapshot(&self) -> Vec<UiPatch> {
        let mut patches = Vec::new();
        for id in &self.order {
            let Some(mirror) = self.elements.get(id) else {
                continue;
            };
            match &mirror.spec {
                Some(spec) => {
                    let mut element = spec.clone();
                    if let Some(text) = &mirror.text {
                        element.text = text.clone();
                    }
                    if let Some(class) = &mirror.class {
                        element.class = class.clone();
                    }
                    patches.push(UiPatch::Create { element });
                }
                None => {
                    if let Some(text) = &mirror.text {
                        patches.push(UiPatch::SetText {
                            id: id.clone(),
                            text: text.clone(),
                        });
                    }
                    if let Some(class) = &mirror.class {
                        patches.push(UiPatch::SetClass {
                            id: id.clone(),
                            class: class.clone(),
                        });
                    }
                }
            }
            match mirror.visible {
                Some(true) => patches.push(UiPatch::Show { id: id.clone() }),
                Some(false) => patches.push(UiPatch::Hide { id: id.clone() }),
                None => {}
            }
        }
        patches
    }
}

impl UiSurface for BusUi {
    fn exists(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn create(&mut self, element: ElementSpec) {
        if self.elements.contains_key(&element.id) {
            return;
        }
        self.order.push(element.id.clone());
        self.elements.insert(
            element.id.clone(),
            Mirror {
                spec: Some(element.clone()),
                ..Mirror::default()
            },
        );
        self.publish(UiPatch::Create { element });
    }

    fn set_text(&mut self, id: &str, text: &str) {
        let Some(mirror) = self.elements.get_mut(id) else {
            return;
        };
        if mirror.text.as_deref() == Some(text) {
            return;
        }
        mirror.text = Some(text.to_string());
        self.publish(UiPatch::SetText {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    fn set_class(&mut self, id: &str, class: &str) {
        let Some(mirror) = self.elements.get_mut(id) else {
            return;
        };
        if mirror.class.as_deref() == Some(class) {
            return;
        }
        mirror.class = Some(class.to_string());
        self.publish(UiPatch::SetClass {
            id: id.to_string(),
            class: class.to_string(),
        });
    }

    fn show(&mut self, id: &str) {
        let Some(mirror) = self.elements.get_mut(id) else {
            return;
        };
        if mirror.visible == Some(true) {
            return;
        }
        mirror.visible = Some(true);
        self.publish(UiPatch::Show { id: id.to_string() });
    }

    fn hide(&mut self, id: &str) {
        let Some(mirror) = self.elements.get_mut(id) else {
            return;
        };
        if mirror.visible == Some(false) {
            return;
        }
        mirror.visible = Some(false);
        self.publish(UiPatch::Hide { id: id.to_string() });
    }

    fn notify(&mut self, message: &str) {
        self.publish(UiPatch::Notify {
            message: message.to_string(),
        });
    }

    /// Publish [`snapshot`][BusUi::snapshot] on the UI topic.
    fn resync(&mut self) {
        for patch in self.snapshot() {
            self.publish(patch);
        }
    }
}
