//! Pipeline assembly.
//!
//! # Data Flow
//! ```text
//! startup:
//!     LogConfig (built or loaded once)
//!         → Pipeline::new(&config, sink)      (serializer fixed here)
//!         → pipeline.attach(capability, bus)  (dedup defaults, wire source)
//!
//! per request (instrumented host):
//!     bus.publish(ACTION_COMPLETED, event) → aggregator → sink
//!
//! per request (legacy host):
//!     adapter.dispatch(context, action) → aggregator → sink
//! ```

use std::sync::Arc;

use crate::aggregator::EventAggregator;
use crate::compat::{FrameworkCapability, LegacyDispatch};
use crate::config::LogConfig;
use crate::sink::LogSink;
use crate::subscriber::{install_aggregator, remove_default_listeners, ListenerRegistry};

/// The assembled logging pipeline: one aggregator bound to one sink, ready
/// to be wired to whichever event source the host offers.
pub struct Pipeline {
    aggregator: Arc<EventAggregator>,
}

impl Pipeline {
    /// Build the pipeline from the startup config. Format validation already
    /// happened when the config was constructed; nothing here can fail at
    /// request time.
    pub fn new(config: &LogConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            aggregator: Arc::new(EventAggregator::new(config, sink)),
        }
    }

    /// Wire the pipeline to the host: remove the framework's default log
    /// listeners, then connect the event source matching the capability.
    /// Returns the dispatch adapter for legacy hosts.
    pub fn attach<R: ListenerRegistry + ?Sized>(
        &self,
        capability: FrameworkCapability,
        registry: &mut R,
    ) -> Option<LegacyDispatch> {
        remove_default_listeners(registry);
        match capability {
            FrameworkCapability::Instrumented => {
                install_aggregator(registry, self.aggregator.clone());
                None
            }
            FrameworkCapability::Legacy => Some(self.legacy_adapter()),
        }
    }

    /// Remove competing default listeners and install the aggregator as the
    /// sole consumer of the completion channel. Safe to call repeatedly;
    /// the listener is installed at most once.
    pub fn install<R: ListenerRegistry + ?Sized>(&self, registry: &mut R) -> bool {
        remove_default_listeners(registry);
        install_aggregator(registry, self.aggregator.clone())
    }

    /// Adapter for hosts without an instrumentation channel.
    pub fn legacy_adapter(&self) -> LegacyDispatch {
        LegacyDispatch::new(self.aggregator.clone())
    }
}
