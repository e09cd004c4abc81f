use pheco_event_bus::{EventBus, EventReceiverExt};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
struct StepChanged(u8);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Theme(&'static str);

#[tokio::test]
async fn broadcast_reaches_every_subscriber() {
    let bus = EventBus::new();
    let mut first = bus.subscribe::<StepChanged>().unwrap();
    let mut second = bus.subscribe::<StepChanged>().unwrap();

    assert_eq!(bus.publish(StepChanged(2)).unwrap(), 2);

    assert_eq!(*first.next_event().await.unwrap(), StepChanged(2));
    assert_eq!(*second.next_event().await.unwrap(), StepChanged(2));
}

#[tokio::test]
async fn lagging_receiver_resumes_at_the_tail() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_with_capacity::<StepChanged>(2).unwrap();

    for step in 1..=6 {
        bus.publish(StepChanged(step)).unwrap();
    }

    let first = rx.next_event().await.unwrap();
    assert_eq!(*first, StepChanged(5));
    let second = rx.next_event().await.unwrap();
    assert_eq!(*second, StepChanged(6));
}

#[tokio::test]
async fn watch_yields_latest_value_only() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_watch(Theme("light")).unwrap();
    assert_eq!(rx.borrow().0, "light");

    bus.publish_watch(Theme("dark")).unwrap();
    bus.publish_watch(Theme("system")).unwrap();

    let latest = rx.next_event().await.unwrap();
    assert_eq!(latest.0, "system");
}

#[tokio::test]
async fn shutdown_closes_receivers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<StepChanged>().unwrap();
    assert_eq!(bus.shutdown(), 1);

    let closed = tokio::time::timeout(Duration::from_millis(100), rx.next_event()).await;
    assert_eq!(closed, Ok(None));
}
