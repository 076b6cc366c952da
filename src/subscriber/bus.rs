//! Listener registry contract and the in-process bus.

use std::collections::HashMap;
use std::sync::Arc;

use crate::event::RequestEvent;

/// A subscriber on an instrumentation channel.
pub trait Listener: Send + Sync {
    fn on_event(&self, event: &RequestEvent);
}

/// Identity of the component that registered a listener. Deduplication
/// removes by owner, not by channel name or position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerOwner {
    /// The host framework's built-in request logger.
    FrameworkRequestLogger,

    /// The host framework's built-in view logger.
    FrameworkViewLogger,

    /// This pipeline's aggregator.
    RequestLogPipeline,

    /// Anything else registered on the bus; never touched by deduplication.
    External(String),
}

/// Handle to one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Capability contract the pipeline needs from the host's notification bus:
/// enumerate listeners per channel with their owners, remove by identity,
/// and subscribe.
pub trait ListenerRegistry {
    /// Register a listener on a channel; returns its removal handle.
    fn subscribe(
        &mut self,
        channel: &str,
        owner: ListenerOwner,
        listener: Arc<dyn Listener>,
    ) -> ListenerId;

    /// All listeners currently installed on a channel.
    fn listeners(&self, channel: &str) -> Vec<(ListenerId, ListenerOwner)>;

    /// Remove a listener by identity. Returns false if it was already gone.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

struct Subscription {
    id: ListenerId,
    owner: ListenerOwner,
    listener: Arc<dyn Listener>,
}

/// In-process notification bus. Embedders without a host bus publish
/// completion events through this; tests drive the whole pipeline with it.
#[derive(Default)]
pub struct InProcessBus {
    next_id: u64,
    channels: HashMap<String, Vec<Subscription>>,
}

impl InProcessBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan an event out to every listener on the channel, in subscription
    /// order.
    pub fn publish(&self, channel: &str, event: &RequestEvent) {
        if let Some(subscriptions) = self.channels.get(channel) {
            for subscription in subscriptions {
                subscription.listener.on_event(event);
            }
        }
    }
}

impl ListenerRegistry for InProcessBus {
    fn subscribe(
        &mut self,
        channel: &str,
        owner: ListenerOwner,
        listener: Arc<dyn Listener>,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.channels
            .entry(channel.to_string())
            .or_default()
            .push(Subscription {
                id,
                owner,
                listener,
            });
        id
    }

    fn listeners(&self, channel: &str) -> Vec<(ListenerId, ListenerOwner)> {
        self.channels
            .get(channel)
            .map(|subscriptions| {
                subscriptions
                    .iter()
                    .map(|s| (s.id, s.owner.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for subscriptions in self.channels.values_mut() {
            if let Some(index) = subscriptions.iter().position(|s| s.id == id) {
                subscriptions.remove(index);
                return true;
            }
        }
        false
    }
}
