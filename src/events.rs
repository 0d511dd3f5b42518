//! Provider events and the sink they are delivered to.
//!
//! The sink is supplied at construction time (typically the host SDK's event
//! bus); this crate never reaches into process-wide registries.

/// A provider lifecycle or configuration event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The provider became ready to serve evaluations.
    Ready,
    /// The provider is serving possibly-outdated flag data.
    Stale {
        /// Human-readable description of why the data may be outdated.
        message: String,
    },
    /// The provider entered an unrecoverable error state.
    Error {
        /// Human-readable description of the failure.
        message: String,
    },
    /// Flag configuration changed.
    ConfigurationChanged {
        /// Keys of the flags whose configuration changed.
        flag_keys: Vec<String>,
    },
}

/// Receives provider events and fans them out to subscribers.
///
/// Implementations must be cheap and non-blocking: events are emitted while
/// the lifecycle holds its state lock, so a sink must not call back into the
/// provider.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: ProviderEvent);
}
