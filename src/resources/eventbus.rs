//! Topic-keyed publish/subscribe bus.
//!
//! The [`EventBus`] is a cheap, cloneable handle: every clone talks to the same
//! registry, so it can be inserted as an ECS resource and also handed to
//! components that need to (un)subscribe on their own.
//!
//! Handlers run synchronously inside [`EventBus::publish`], in registration
//! order. A handler receives the bus that invoked it, which lets it
//! unsubscribe itself without holding a second handle.
//!
//! Topics are free-form strings. Resource readiness uses the
//! `resource-<kind>-<name>` convention, see
//! [`resource_topic`](crate::events::resource::resource_topic).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy_ecs::prelude::Resource;
use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Optional data attached to a published event.
pub type EventPayload = serde_json::Value;

/// An event as seen by a handler.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Topic the event was published on.
    pub topic: &'a str,
    /// Payload passed to [`EventBus::publish`], if any.
    pub payload: Option<&'a EventPayload>,
}

/// Shared handler callback. Identity is the `Arc` allocation, not the closure body.
pub type Handler = Arc<dyn Fn(&EventBus, &Event<'_>) + Send + Sync>;

/// Opaque id assigned to one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Token returned by [`EventBus::subscribe`]. Pass it back to
/// [`EventBus::cancel`] to remove exactly that registration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    topic: String,
    id: SubscriptionId,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    topics: FxHashMap<String, SmallVec<[Subscriber; 4]>>,
}

/// Publish/subscribe registry shared by reference-counted handle.
#[derive(Resource, Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // A panicking handler never runs while the lock is held, so the data is consistent.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` under `topic`. Handlers for one topic are invoked in
    /// the order they were registered.
    pub fn subscribe(&self, topic: impl Into<String>, handler: Handler) -> Subscription {
        let topic = topic.into();
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry()
            .topics
            .entry(topic.clone())
            .or_default()
            .push(Subscriber { id, handler });
        trace!("eventbus: subscribed #{} to '{}'", id.0, topic);
        Subscription { topic, id }
    }

    /// Convenience wrapper around [`subscribe`](Self::subscribe) for plain closures.
    pub fn subscribe_fn<F>(&self, topic: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&EventBus, &Event<'_>) + Send + Sync + 'static,
    {
        self.subscribe(topic, Arc::new(handler))
    }

    /// Remove the registration of this exact `handler` instance from `topic`.
    ///
    /// Returns whether something was removed. Unknown topics and handlers that
    /// are not registered are ignored.
    pub fn unsubscribe(&self, topic: &str, handler: &Handler) -> bool {
        self.remove_where(topic, |s| Arc::ptr_eq(&s.handler, handler))
    }

    /// Remove the registration identified by `subscription`.
    ///
    /// Cancelling twice is a no-op.
    pub fn cancel(&self, subscription: &Subscription) -> bool {
        self.remove_where(&subscription.topic, |s| s.id == subscription.id)
    }

    fn remove_where(&self, topic: &str, pred: impl Fn(&Subscriber) -> bool) -> bool {
        let mut registry = self.registry();
        let Some(subscribers) = registry.topics.get_mut(topic) else {
            return false;
        };
        let Some(index) = subscribers.iter().position(pred) else {
            return false;
        };
        let removed = subscribers.remove(index);
        if subscribers.is_empty() {
            registry.topics.remove(topic);
        }
        trace!("eventbus: removed #{} from '{}'", removed.id.0, topic);
        true
    }

    /// Invoke every handler registered for `topic`, synchronously and in
    /// registration order. Returns the number of handlers invoked.
    ///
    /// Handlers may subscribe or unsubscribe while the publish is running.
    /// Handlers added during the call are not invoked by it; handlers removed
    /// before their turn are skipped.
    pub fn publish(&self, topic: &str, payload: Option<&EventPayload>) -> usize {
        let snapshot: SmallVec<[(SubscriptionId, Handler); 4]> = {
            let registry = self.registry();
            match registry.topics.get(topic) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.handler)))
                    .collect(),
                None => return 0,
            }
        };

        let event = Event { topic, payload };
        let mut invoked = 0;
        for (id, handler) in snapshot {
            if !self.is_registered(topic, id) {
                continue;
            }
            handler(self, &event);
            invoked += 1;
        }
        trace!("eventbus: published '{}' to {} handler(s)", topic, invoked);
        invoked
    }

    fn is_registered(&self, topic: &str, id: SubscriptionId) -> bool {
        self.registry()
            .topics
            .get(topic)
            .is_some_and(|subscribers| subscribers.iter().any(|s| s.id == id))
    }

    /// Number of handlers currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry().topics.get(topic).map_or(0, |s| s.len())
    }

    /// Whether any handler is registered for `topic`.
    pub fn has_subscribers(&self, topic: &str) -> bool {
        self.subscriber_count(topic) > 0
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        f.debug_struct("EventBus")
            .field("topics", &registry.topics.len())
            .finish()
    }
}
