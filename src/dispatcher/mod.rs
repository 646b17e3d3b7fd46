//! Tick-driven delivery of client notifications.
//!
//! The host calls [`EventDispatcher::tick`] once per frame. It is the only
//! point where data produced by the background tasks reaches the consumer, and
//! every listener runs on the ticking thread.

mod event;
pub use event::*;


use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use crate::LatestPayload;

type Listener = Box<dyn FnMut(&str) + Send + 'static>;

pub struct EventDispatcher {
    latest: Arc<LatestPayload>,
    /// Value handed to the message listeners by the last delivering tick
    last_delivered: Option<Arc<String>>,
    events: mpsc::UnboundedReceiver<ClientEvent>,
    message_listeners: Vec<Listener>,
    failure_listeners: Vec<Listener>,
}

impl EventDispatcher {
    pub(crate) fn new(
        latest: Arc<LatestPayload>,
        events: mpsc::UnboundedReceiver<ClientEvent>,
    ) -> Self {
        Self {
            latest,
            last_delivered: None,
            events,
            message_listeners: Vec::new(),
            failure_listeners: Vec::new(),
        }
    }

    pub fn on_message_received<F>(
        &mut self,
        listener: F,
    ) where
        F: FnMut(&str) + Send + 'static,
    {
        self.message_listeners.push(Box::new(listener));
    }

    pub fn on_connection_failed<F>(
        &mut self,
        listener: F,
    ) where
        F: FnMut(&str) + Send + 'static,
    {
        self.failure_listeners.push(Box::new(listener));
    }

    /// Runs one polling step.
    ///
    /// Delivers queued connection failures first, then the latest payload if
    /// it differs by value from the one delivered last. Payloads overwritten
    /// between two ticks are never seen. Returns the notifications fired, in
    /// delivery order.
    pub fn tick(&mut self) -> Vec<ClientEvent> {
        let mut fired = Vec::new();

        while let Ok(event) = self.events.try_recv() {
            if let ClientEvent::ConnectionFailed(reason) = &event {
                for listener in self.failure_listeners.iter_mut() {
                    listener(reason.as_str());
                }
            }
            fired.push(event);
        }

        if let Some(latest) = self.latest.load() {
            let changed = self.last_delivered.as_deref() != Some(&*latest);
            if changed {
                trace!("delivering new payload ({} bytes)", latest.len());
                for listener in self.message_listeners.iter_mut() {
                    listener(latest.as_str());
                }
                fired.push(ClientEvent::MessageReceived(latest.to_string()));
                self.last_delivered = Some(latest);
            }
        }

        fired
    }

    /// Last payload handed to the message listeners
    pub fn last_delivered(&self) -> Option<&str> {
        self.last_delivered.as_deref().map(String::as_str)
    }
}
