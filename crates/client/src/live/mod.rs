//! Live-edit signal channel.
//!
//! The dashboard relays edits into the page as opaque cross-frame messages.
//! The host hands each raw message to [`EditChannel::relay_message`], and
//! subscribers (one per [`crate::SectionView`]) receive the recognised
//! [`EditEvent`]s.
//!
//! The channel is an explicit object owned by whoever builds the session;
//! there is no process-wide bus. A subscription lasts as long as its
//! [`EditSubscription`] value and ends when that value is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Default number of buffered events per subscriber.
const DEFAULT_CAPACITY: usize = 64;

/// Message type the dashboard uses for a saved element.
pub const SAVE_ELEMENT: &str = "SAVE_ELEMENT";

/// Edit signal relayed from the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditEvent {
    /// The dashboard saved new content for a section.
    #[serde(rename = "SAVE_ELEMENT")]
    SaveElement { id: String, content: Value },
}

impl EditEvent {
    /// Parse a raw cross-frame message. Unknown or malformed messages yield `None`.
    pub fn from_message(message: &Value) -> Option<Self> {
        if message.get("type").and_then(Value::as_str) != Some(SAVE_ELEMENT) {
            return None;
        }
        match serde_json::from_value(message.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!("ignoring malformed {} message: {}", SAVE_ELEMENT, e);
                None
            }
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            EditEvent::SaveElement { id, .. } => id,
        }
    }
}

/// Broadcast channel for edit events.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct EditChannel {
    sender: broadcast::Sender<EditEvent>,
}

impl Default for EditChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EditChannel {
    /// Create a channel buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver `event` to current subscribers. Returns how many received it.
    pub fn publish(&self, event: EditEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Parse and publish a raw dashboard message.
    ///
    /// Returns `false` if the message is not an edit event.
    pub fn relay_message(&self, message: &Value) -> bool {
        match EditEvent::from_message(message) {
            Some(event) => {
                let delivered = self.publish(event);
                tracing::debug!(delivered, "relayed dashboard edit");
                true
            }
            None => false,
        }
    }

    pub fn subscribe(&self) -> EditSubscription {
        EditSubscription { receiver: self.sender.subscribe() }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Live subscription to an [`EditChannel`]. Unsubscribes on drop.
#[derive(Debug)]
pub struct EditSubscription {
    receiver: broadcast::Receiver<EditEvent>,
}

impl EditSubscription {
    /// Wait for the next event. Returns `None` once every channel handle is gone.
    ///
    /// Events dropped because this subscriber fell behind are skipped.
    pub async fn recv(&mut self) -> Option<EditEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "edit subscriber lagged, skipping missed events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next event addressed to `section_id`.
    pub async fn recv_for(&mut self, section_id: &str) -> Option<EditEvent> {
        loop {
            let event = self.recv().await?;
            if event.section_id() == section_id {
                return Some(event);
            }
        }
    }
}
