//! Headless, typed, topic-based publish/subscribe event bus.
//!
//! Uses [`tokio::sync::broadcast`] channels under the hood so that every
//! subscriber receives every message without any single subscriber blocking
//! the others.
//!
//! # Topics
//!
//! | Topic | Typical traffic |
//! |---|---|
//! | [`Topic::Scene`] | Joint poses and stage resizes for the renderer |
//! | [`Topic::Ui`] | DOM patches for the viewer page |
//! | [`Topic::Input`] | Keys, clicks, slider and resize events from the page |

use jointview_types::{Event, ViewError};
use tokio::sync::broadcast;

/// Default channel capacity (number of buffered events before old ones are
/// dropped for slow subscribers).
const DEFAULT_CAPACITY: usize = 1024;

/// Routing lanes of the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Renderer-bound scene state: poses, stage size.
    Scene,
    /// Renderer-bound page mutations.
    Ui,
    /// Browser-originated user input.
    Input,
}

/// Shared event bus. Clone it cheaply – all clones share the same underlying
/// broadcast channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    scene: broadcast::Sender<Event>,
    ui: broadcast::Sender<Event>,
    input: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// The `capacity` is applied to every topic channel independently.
    pub fn new(capacity: usize) -> Self {
        let (scene, _) = broadcast::channel(capacity);
        let (ui, _) = broadcast::channel(capacity);
        let (input, _) = broadcast::channel(capacity);
        Self { scene, ui, input }
    }

    /// Publish `event` to the given [`Topic`] channel.
    ///
    /// Returns the number of active receivers that were handed the event, or
    /// [`ViewError::Channel`] when nobody is listening on the topic.
    pub fn publish_to(&self, topic: Topic, event: Event) -> Result<usize, ViewError> {
        self.topic_sender(topic)
            .send(event)
            .map_err(|_| ViewError::Channel(format!("No subscribers for topic {topic:?}")))
    }

    /// Subscribe to a specific [`Topic`] channel.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.topic_sender(topic).subscribe(),
        }
    }

    /// Number of live receivers on `topic`.
    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.topic_sender(topic).receiver_count()
    }

    fn topic_sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Scene => &self.scene,
            Topic::Ui => &self.ui,
            Topic::Input => &self.input,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// An async receiver bound to a single [`Topic`] channel.
///
/// Obtained via [`EventBus::subscribe_to`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<Event>,
}

impl TopicReceiver {
    /// Wait for the next event on this topic.
    ///
    /// Returns:
    /// * `Ok(event)` – a successfully received event.
    /// * `Err(broadcast::error::RecvError::Lagged(n))` – the subscriber fell
    ///   behind and `n` messages were dropped.  The caller decides whether to
    ///   continue or abort.
    /// * `Err(broadcast::error::RecvError::Closed)` – the bus has shut down.
    pub async fn recv(&mut self) -> Result<Event, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`recv`][Self::recv].
    pub fn try_recv(&mut self) -> Result<Event, broadcast::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// The [`Topic`] this receiver is bound to.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_types::{EventPayload, InputEvent};

    fn make_event(source: &str) -> Event {
        Event::new(
            source,
            EventPayload::Input(InputEvent::Key {
                key: "q".into(),
                pressed: true,
            }),
        )
    }

    #[test]
    fn publish_without_subscribers_is_an_error() {
        let bus = EventBus::default();
        let result = bus.publish_to(Topic::Ui, make_event("test"));
        assert!(matches!(result, Err(ViewError::Channel(_))));
    }

    #[tokio::test]
    async fn topic_multiple_subscribers_receive_same_event() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut subscriber1 = bus.subscribe_to(Topic::Input);
        let mut subscriber2 = bus.subscribe_to(Topic::Input);

        let event = make_event("cockpit::ws");
        assert_eq!(bus.publish_to(Topic::Input, event.clone())?, 2);

        assert_eq!(subscriber1.recv().await?.id, event.id);
        assert_eq!(subscriber2.recv().await?.id, event.id);
        Ok(())
    }

    /// A subscriber on `Ui` must not receive events published to `Scene`.
    #[tokio::test]
    async fn topic_subscriber_does_not_receive_other_topic_events() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut ui_sub = bus.subscribe_to(Topic::Ui);
        let _scene_sub = bus.subscribe_to(Topic::Scene);

        bus.publish_to(Topic::Scene, make_event("scene"))?;

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(50), ui_sub.recv()).await;
        assert!(result.is_err(), "Ui subscriber must not receive a Scene event");
        assert_eq!(ui_sub.topic(), Topic::Ui);
        Ok(())
    }

    /// Flooding a low-capacity channel while a subscriber sleeps must produce
    /// a `Lagged` error rather than panicking or blocking.
    #[tokio::test]
    async fn topic_channel_lag_on_slow_subscriber() {
        let bus = EventBus::new(16);
        let mut slow_sub = bus.subscribe_to(Topic::Scene);

        for _ in 0..1_000 {
            let _ = bus.publish_to(Topic::Scene, make_event("flood"));
        }

        let result = slow_sub.recv().await;
        assert!(
            matches!(result, Err(broadcast::error::RecvError::Lagged(_))),
            "expected Lagged error, got: {result:?}"
        );
    }

    #[test]
    fn receiver_count_tracks_subscriptions() {
        let bus = EventBus::default();
        assert_eq!(bus.receiver_count(Topic::Input), 0);
        let rx = bus.subscribe_to(Topic::Input);
        assert_eq!(bus.receiver_count(Topic::Input), 1);
        drop(rx);
        assert_eq!(bus.receiver_count(Topic::Input), 0);
    }
}
