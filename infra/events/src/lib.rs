//! # Event Bus
//!
//! Typed, in-process publish/subscribe used to decouple the registration wizard from
//! whatever presents it (CLI output, toasts in the desktop UI, audit logging).
//!
//! Events are keyed by their Rust type. Each type lives on exactly one channel kind:
//!
//! * **Broadcast**: fan-out of discrete events (`RegistrationEvent`).
//! * **Watch**: latest value only, for state snapshots (`AppState`).
//!
//! # Example
//!
//! ```rust
//! use pheco_event_bus::{EventBus, EventReceiverExt, EventBusError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct StepChanged { to: u8 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<StepChanged>()?;
//!     bus.publish(StepChanged { to: 2 })?;
//!
//!     let event = rx.next_event().await.expect("channel open");
//!     assert_eq!(event.to, 2);
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
