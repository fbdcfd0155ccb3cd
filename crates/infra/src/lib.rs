//! Infrastructure layer: storage, locking, clocks, notification, config.

pub mod clock;
pub mod config;
pub mod locks;
pub mod negotiation_service;
pub mod notifier;
pub mod read_model;
pub mod repository;


pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DealroomConfig};
pub use locks::LeadLocks;
pub use negotiation_service::{NegotiationService, NewListing, ServiceError};
pub use notifier::{BusNotifier, Notifier};
pub use read_model::{PipelineBucket, PipelineSummary};
pub use repository::{InMemoryLeadRepository, LeadRepository, RepositoryError};
