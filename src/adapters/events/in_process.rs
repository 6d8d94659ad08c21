//! In-process event bus.
//!
//! Dispatches every published event to each subscribed handler on its own
//! tokio task. `publish` returns as soon as the tasks are spawned; a slow,
//! failing or panicking handler never reaches the publisher.
//!
//! There is no back-pressure: each (event, handler) pair is one task, so
//! fan-out is unbounded. Two events delivered to the same handler may be
//! processed in either order; handlers treat events as a hint to re-read
//! state rather than as deltas.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// Fire-and-forget event bus for a single process.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InProcessEventBus::new());
/// bus.subscribe(SESSION_UPDATED, broadcaster);
///
/// bus.publish(event.to_envelope()).await?;
/// ```
pub struct InProcessEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventEnvelope>>,
    record: bool,
}

impl InProcessEventBus {
    /// Creates a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
            record: false,
        }
    }

    /// Creates a bus that also keeps every published envelope for
    /// inspection.
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::new()
        }
    }

    /// Returns all published events, if recording.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns recorded events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns recorded events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Returns count of recorded events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of handlers subscribed to `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Vec::len)
    }

    fn handlers_for(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InProcessEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.record {
            self.published
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        }

        let handlers = self.handlers_for(&event.event_type);
        tracing::debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            handlers = handlers.len(),
            "Dispatching event"
        );

        for handler in handlers {
            let event = event.clone();
            tokio::spawn(async move {
                let event_id = event.event_id;
                if let Err(e) = handler.handle(event).await {
                    tracing::error!(
                        handler = handler.name(),
                        event_id = %event_id,
                        error = %e,
                        "Event handler failed"
                    );
                }
            });
        }

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for InProcessEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for event_type in event_types {
            handlers
                .entry(event_type.to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn test_envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, aggregate_id, "Test", json!({}))
    }

    struct CountingHandler {
        count: Arc<AtomicUsize>,
        notify: Arc<Notify>,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.notify.notify_one();
            Ok(())
        }
        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::StorageError, "Handler failed"))
        }
        fn name(&self) -> &'static str {
            "FailingHandler"
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl EventHandler for PanickingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            panic!("handler blew up");
        }
        fn name(&self) -> &'static str {
            "PanickingHandler"
        }
    }

    fn counting() -> (Arc<CountingHandler>, Arc<AtomicUsize>, Arc<Notify>) {
        let count = Arc::new(AtomicUsize::new(0));
        let notify = Arc::new(Notify::new());
        let handler = Arc::new(CountingHandler {
            count: count.clone(),
            notify: notify.clone(),
        });
        (handler, count, notify)
    }

    async fn wait_for(count: &AtomicUsize, notify: &Notify, expected: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while count.load(Ordering::SeqCst) < expected {
                notify.notified().await;
            }
        })
        .await
        .expect("handlers did not run in time");
    }

    #[tokio::test]
    async fn handler_receives_published_event() {
        let bus = InProcessEventBus::new();
        let (handler, count, notify) = counting();
        bus.subscribe("test.event", handler);

        bus.publish(test_envelope("test.event", "1")).await.unwrap();

        wait_for(&count, &notify, 1).await;
    }

    #[tokio::test]
    async fn multiple_handlers_all_invoked() {
        let bus = InProcessEventBus::new();
        let (handler, count, notify) = counting();
        bus.subscribe("test.event", handler.clone());
        bus.subscribe("test.event", handler.clone());
        bus.subscribe("test.event", handler);

        bus.publish(test_envelope("test.event", "1")).await.unwrap();

        wait_for(&count, &notify, 3).await;
    }

    #[tokio::test]
    async fn subscribe_all_registers_for_multiple_types() {
        let bus = InProcessEventBus::new();
        let (handler, count, notify) = counting();
        bus.subscribe_all(&["type.a", "type.b", "type.c"], handler);

        bus.publish(test_envelope("type.a", "1")).await.unwrap();
        bus.publish(test_envelope("type.b", "2")).await.unwrap();
        bus.publish(test_envelope("type.d", "3")).await.unwrap();

        wait_for(&count, &notify, 2).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(bus.handler_count("type.d"), 0);
    }

    #[tokio::test]
    async fn failing_handler_does_not_fail_publish_or_siblings() {
        let bus = InProcessEventBus::new();
        let (handler, count, notify) = counting();
        bus.subscribe("test.event", Arc::new(FailingHandler));
        bus.subscribe("test.event", Arc::new(PanickingHandler));
        bus.subscribe("test.event", handler);

        let result = bus.publish(test_envelope("test.event", "1")).await;

        assert!(result.is_ok());
        wait_for(&count, &notify, 1).await;
    }

    #[tokio::test]
    async fn publish_does_not_wait_for_handlers() {
        struct SlowHandler;

        #[async_trait]
        impl EventHandler for SlowHandler {
            async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }
            fn name(&self) -> &'static str {
                "SlowHandler"
            }
        }

        let bus = InProcessEventBus::new();
        bus.subscribe("test.event", Arc::new(SlowHandler));

        tokio::time::timeout(
            Duration::from_millis(100),
            bus.publish(test_envelope("test.event", "1")),
        )
        .await
        .expect("publish blocked on handler")
        .unwrap();
    }

    #[tokio::test]
    async fn recording_bus_keeps_events_in_order() {
        let bus = InProcessEventBus::recording();

        bus.publish_all(vec![
            test_envelope("type.a", "agg-1"),
            test_envelope("type.b", "agg-2"),
            test_envelope("type.a", "agg-1"),
        ])
        .await
        .unwrap();

        assert_eq!(bus.event_count(), 3);
        assert_eq!(bus.events_of_type("type.a").len(), 2);
        assert_eq!(bus.events_for_aggregate("agg-2").len(), 1);
        let types: Vec<String> = bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(types, vec!["type.a", "type.b", "type.a"]);
    }

    #[tokio::test]
    async fn plain_bus_records_nothing() {
        let bus = InProcessEventBus::new();
        bus.publish(test_envelope("type.a", "1")).await.unwrap();
        assert_eq!(bus.event_count(), 0);
    }
}
