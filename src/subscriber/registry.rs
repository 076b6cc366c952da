//! Startup-time listener deduplication and installation.
//!
//! The whole pipeline depends on one invariant: after setup, the only
//! consumer of the completion channel is this pipeline's aggregator. These
//! two functions establish it.

use std::sync::Arc;

use crate::event::{ACTION_COMPLETED, CONTROLLER_CHANNEL, VIEW_CHANNEL};
use crate::subscriber::bus::{Listener, ListenerOwner, ListenerRegistry};

/// Channels the framework's default loggers occupy.
const DEFAULT_LOGGER_CHANNELS: &[&str] = &[CONTROLLER_CHANNEL, VIEW_CHANNEL, ACTION_COMPLETED];

/// Unsubscribe every listener owned by the framework's built-in request and
/// view loggers. Idempotent: running against a registry with none installed
/// is a no-op. Returns how many were removed.
pub fn remove_default_listeners<R: ListenerRegistry + ?Sized>(registry: &mut R) -> usize {
    let mut removed = 0;
    for channel in DEFAULT_LOGGER_CHANNELS {
        for (id, owner) in registry.listeners(channel) {
            match owner {
                ListenerOwner::FrameworkRequestLogger | ListenerOwner::FrameworkViewLogger => {
                    if registry.unsubscribe(id) {
                        removed += 1;
                    }
                }
                _ => {}
            }
        }
    }
    if removed > 0 {
        tracing::debug!(removed, "removed default framework log listeners");
    }
    removed
}

/// Subscribe the pipeline's listener on the completion channel, unless one
/// is already installed. Returns whether a subscription happened; repeated
/// setup never double-fires the aggregator.
pub fn install_aggregator<R: ListenerRegistry + ?Sized>(
    registry: &mut R,
    listener: Arc<dyn Listener>,
) -> bool {
    let already_installed = registry
        .listeners(ACTION_COMPLETED)
        .iter()
        .any(|(_, owner)| *owner == ListenerOwner::RequestLogPipeline);
    if already_installed {
        tracing::debug!("request log listener already installed; skipping");
        return false;
    }
    registry.subscribe(ACTION_COMPLETED, ListenerOwner::RequestLogPipeline, listener);
    true
}
