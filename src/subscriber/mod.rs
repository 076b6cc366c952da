//! Instrumentation subscription management.
//!
//! # Data Flow
//! ```text
//! startup:
//!     registry.rs remove_default_listeners()
//!         → unsubscribes the framework's request/view loggers (by owner)
//!     registry.rs install_aggregator()
//!         → subscribes this pipeline's single listener, exactly once
//!
//! per request:
//!     host publishes "controller.action_completed"
//!         → bus fans out to the one installed listener
//! ```
//!
//! # Design Decisions
//! - Removal is by listener owner identity, never by name pattern: the
//!   registry contract exposes who owns each listener
//! - The pipeline depends on the `ListenerRegistry` trait, not on any one
//!   bus implementation; `InProcessBus` is the crate's own

pub mod bus;
pub mod registry;

pub use bus::{InProcessBus, Listener, ListenerId, ListenerOwner, ListenerRegistry};
pub use registry::{install_aggregator, remove_default_listeners};
