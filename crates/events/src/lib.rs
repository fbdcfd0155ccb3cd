//! Event primitives: the `Event` trait, envelopes, and pub/sub mechanics.
//!
//! Negotiation facts (`LeadEvent`) implement [`Event`]; notification intents
//! travel to external notifiers wrapped in an [`EventEnvelope`] over an [`EventBus`].

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
