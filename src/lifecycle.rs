//! The provider lifecycle state machine.
//!
//! [`Lifecycle`] turns the data source's asynchronous connectivity status
//! into the small set of observable provider states and events, and supports
//! a blocking "initialize and wait" protocol: the wait completes on the first
//! READY transition (success) or ERROR transition (failure). The wait has no
//! timeout of its own; imposing one is the caller's responsibility.

use std::sync::{Arc, Condvar, Mutex};

use crate::data_source::{
    DataSourceState, DataSourceStatus, DataSourceStatusProvider, FlagChangeNotifier,
};
use crate::events::{EventSink, ProviderEvent};
use crate::{Error, Result};

/// Observable readiness of the provider.
///
/// `NotReady` is the initial state and is never re-entered. `Error` is
/// effectively terminal: nothing in this model restarts a shut-down data
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// The provider has not yet become ready.
    NotReady,
    /// The provider is serving up-to-date flag data.
    Ready,
    /// The provider is serving possibly-outdated flag data.
    Stale,
    /// The provider has failed permanently.
    Error,
}

/// The provider lifecycle state machine.
///
/// Status notifications may arrive from background execution contexts; all
/// state reads and writes serialize through a single mutex, so concurrent
/// notifications cannot tear state or double-emit "ready".
pub struct Lifecycle {
    inner: Arc<LifecycleInner>,
}

struct LifecycleInner {
    state: Mutex<ProviderState>,

    /// One-shot completion for the blocking initialization wait.
    ///
    /// Holds `None` until the first terminal transition. Holds `Some(Ok(()))`
    /// after the first READY transition and `Some(Err(...))` after the first
    /// ERROR transition; later transitions keep updating state and emitting
    /// events but no longer touch this slot.
    init: (Mutex<Option<Result<()>>>, Condvar),

    events: Arc<dyn EventSink>,
}

impl Lifecycle {
    /// Create a lifecycle in the `NotReady` state, emitting events into the
    /// given sink.
    pub fn new(events: Arc<dyn EventSink>) -> Lifecycle {
        Lifecycle {
            inner: Arc::new(LifecycleInner {
                state: Mutex::new(ProviderState::NotReady),
                init: (Mutex::new(None), Condvar::new()),
                events,
            }),
        }
    }

    /// The current provider state.
    pub fn state(&self) -> ProviderState {
        *self
            .inner
            .state
            .lock()
            .expect("thread holding lifecycle state lock should not panic")
    }

    /// Initialize the provider and block until it is ready or has failed.
    ///
    /// If the data source is already initialized, the provider becomes ready
    /// immediately; the subscriptions are still registered so that future
    /// transitions continue to be observed. Otherwise this registers the
    /// subscriptions, feeds the current status through the transition logic
    /// once, and blocks until the first READY or ERROR transition.
    ///
    /// # Errors
    ///
    /// - [`Error::ProviderShutdown`] if the data source reports a permanent
    ///   shutdown before the provider becomes ready.
    /// - [`Error::StatusListenerPanicked`] if a status listener panicked
    ///   while holding the lifecycle lock.
    pub fn initialize(
        &self,
        data_source: &dyn DataSourceStatusProvider,
        flag_tracker: &dyn FlagChangeNotifier,
    ) -> Result<()> {
        if data_source.is_initialized() {
            self.inner
                .apply_status(DataSourceStatus::new(DataSourceState::Valid));
            self.register_listeners(data_source, flag_tracker);
            return Ok(());
        }

        self.register_listeners(data_source, flag_tracker);
        // The subscription only delivers future changes; pick up the current
        // status once so a source that settled before registration is not
        // waited on forever.
        self.inner.apply_status(data_source.status());
        self.inner.wait_for_initialization()
    }

    fn register_listeners(
        &self,
        data_source: &dyn DataSourceStatusProvider,
        flag_tracker: &dyn FlagChangeNotifier,
    ) {
        let inner = Arc::clone(&self.inner);
        data_source.add_status_listener(Box::new(move |status| inner.apply_status(status)));

        let events = Arc::clone(&self.inner.events);
        flag_tracker.add_flag_change_listener(Box::new(move |change| {
            events.emit(ProviderEvent::ConfigurationChanged {
                flag_keys: vec![change.key],
            });
        }));
    }
}

impl LifecycleInner {
    /// Apply one status notification.
    ///
    /// Events are emitted while the state lock is held, which serializes the
    /// "first transition to READY" decision with concurrent notifications.
    fn apply_status(&self, status: DataSourceStatus) {
        let mut state = self
            .state
            .lock()
            .expect("thread holding lifecycle state lock should not panic");

        match status.state {
            DataSourceState::Initializing => {
                // The machine never re-enters NotReady after leaving it.
            }
            DataSourceState::Interrupted => {
                log::debug!(target: "flagbridge", "data source interrupted, provider is stale");
                *state = ProviderState::Stale;
                let message = match &status.error {
                    Some(error) => format!("data source interrupted: {error}"),
                    None => "data source interrupted".to_owned(),
                };
                self.events.emit(ProviderEvent::Stale { message });
            }
            DataSourceState::Valid => {
                if *state != ProviderState::Ready {
                    log::debug!(target: "flagbridge", "provider is ready");
                    *state = ProviderState::Ready;
                    self.events.emit(ProviderEvent::Ready);
                    self.complete_initialization(Ok(()));
                }
            }
            DataSourceState::Off => {
                log::debug!(target: "flagbridge", "data source shut down, provider failed");
                *state = ProviderState::Error;
                self.events.emit(ProviderEvent::Error {
                    message: "provider shutdown".to_owned(),
                });
                self.complete_initialization(Err(Error::ProviderShutdown));
            }
        }
    }

    /// Resolve the one-shot initialization completion. Later terminal
    /// transitions are ignored here.
    fn complete_initialization(&self, result: Result<()>) {
        let mut slot = self
            .init
            .0
            .lock()
            .expect("thread holding initialization lock should not panic");
        if slot.is_none() {
            *slot = Some(result);
            self.init.1.notify_all();
        }
    }

    /// Block until the first terminal transition.
    fn wait_for_initialization(&self) -> Result<()> {
        let mut slot = self
            .init
            .0
            .lock()
            .map_err(|_| Error::StatusListenerPanicked)?;
        loop {
            match &*slot {
                Some(result) => return result.clone(),
                None => {
                    slot = self
                        .init
                        .1
                        .wait(slot)
                        .map_err(|_| Error::StatusListenerPanicked)?;
                }
            }
        }
    }
}
