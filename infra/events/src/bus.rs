use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::trace;

/// Default broadcast buffer; wizard sessions emit a handful of events per interaction.
const DEFAULT_CAPACITY: usize = 64;

/// Channel kind backing an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Broadcast,
    Watch,
}

/// Anything `Send + Sync + 'static` can travel on the bus.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Slot {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn broadcast<T: Event>(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
        Self { kind: ChannelKind::Broadcast, sender: Box::new(tx) }
    }

    fn watch<T: Event>(initial: Arc<T>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { kind: ChannelKind::Watch, sender: Box::new(Arc::new(tx)) }
    }

    fn expect_kind<T: Event>(&self, kind: ChannelKind) -> Result<(), EventBusError> {
        if self.kind == kind {
            return Ok(());
        }
        Err(EventBusError::ChannelKindMismatch {
            message: format!("{} is registered as {:?}, not {kind:?}", type_name::<T>(), self.kind)
                .into(),
            context: None,
        })
    }

    fn downcast<S: Clone + 'static, T: Event>(&self) -> Result<S, EventBusError> {
        self.sender.downcast_ref::<S>().cloned().ok_or_else(|| EventBusError::Internal {
            message: type_name::<T>().into(),
            context: Some("Stored sender has an unexpected type".into()),
        })
    }
}

/// Thread-safe event bus; clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    slots: Arc<RwLock<FxHashMap<TypeId, Slot>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T`.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a watch channel.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Like [`EventBus::subscribe`]; `capacity` only applies when the channel is created here.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for zero, [`EventBusError::ChannelKindMismatch`]
    /// if `T` is registered as a watch channel.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes `event` to every current broadcast subscriber.
    ///
    /// Returns the number of receivers; publishing without subscribers is not an error.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(Arc::new(event)).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Subscribes to the latest value of `T`, seeding the channel with `initial` if absent.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a broadcast channel.
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        Ok(self.watch_sender(Arc::new(initial))?.subscribe())
    }

    /// Replaces the latest value of `T`, creating the watch channel if needed.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a broadcast channel.
    pub fn publish_watch<T: Event>(&self, value: T) -> Result<(), EventBusError> {
        let value = Arc::new(value);
        self.watch_sender(Arc::clone(&value))?.send_replace(value);
        trace!(event = type_name::<T>(), "Watch value replaced");
        Ok(())
    }

    /// Kind registered for `T`, if any.
    #[must_use]
    pub fn kind_of<T: Event>(&self) -> Option<ChannelKind> {
        self.slots.read().get(&TypeId::of::<T>()).map(|slot| slot.kind)
    }

    /// Drops every channel; receivers observe closure. Returns how many were closed.
    pub fn shutdown(&self) -> usize {
        let mut slots = self.slots.write();
        let closed = slots.len();
        slots.clear();
        closed
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();
        if let Some(slot) = self.slots.read().get(&id) {
            slot.expect_kind::<T>(ChannelKind::Broadcast)?;
            return slot.downcast::<broadcast::Sender<Arc<T>>, T>();
        }

        let mut slots = self.slots.write();
        let slot = slots.entry(id).or_insert_with(|| Slot::broadcast::<T>(capacity));
        slot.expect_kind::<T>(ChannelKind::Broadcast)?;
        slot.downcast::<broadcast::Sender<Arc<T>>, T>()
    }

    fn watch_sender<T: Event>(
        &self,
        initial: Arc<T>,
    ) -> Result<Arc<watch::Sender<Arc<T>>>, EventBusError> {
        let id = TypeId::of::<T>();
        if let Some(slot) = self.slots.read().get(&id) {
            slot.expect_kind::<T>(ChannelKind::Watch)?;
            return slot.downcast::<Arc<watch::Sender<Arc<T>>>, T>();
        }

        let mut slots = self.slots.write();
        let slot = slots.entry(id).or_insert_with(|| Slot::watch(initial));
        slot.expect_kind::<T>(ChannelKind::Watch)?;
        slot.downcast::<Arc<watch::Sender<Arc<T>>>, T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Ping).unwrap(), 0);
        assert_eq!(bus.kind_of::<Ping>(), Some(ChannelKind::Broadcast));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let bus = EventBus::new();
        let err = bus.subscribe_with_capacity::<Ping>(0).unwrap_err();
        assert!(matches!(err, EventBusError::InvalidCapacity { .. }));
        assert!(bus.kind_of::<Ping>().is_none());
    }

    #[test]
    fn kinds_do_not_mix() {
        let bus = EventBus::new();
        bus.publish_watch(7_u32).unwrap();
        let err = bus.publish(8_u32).unwrap_err();
        assert!(matches!(err, EventBusError::ChannelKindMismatch { .. }));
    }

    #[test]
    fn shutdown_counts_channels() {
        let bus = EventBus::new();
        bus.publish(Ping).unwrap();
        bus.publish_watch(1_u8).unwrap();
        assert_eq!(bus.shutdown(), 2);
        assert!(bus.kind_of::<Ping>().is_none());
    }
}
