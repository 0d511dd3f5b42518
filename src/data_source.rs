//! Status model for the underlying flag data source, and the collaborator
//! traits through which the provider lifecycle observes it.
//!
//! The data source itself (streaming, polling, file-based, ...) is external
//! to this crate; the lifecycle only consumes its connectivity status and
//! flag-change notifications.

use chrono::{DateTime, Utc};

/// Connectivity state reported by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceState {
    /// The initial connection attempt is still in progress.
    Initializing,
    /// The connection was lost after having been established; the data source
    /// is attempting to recover.
    Interrupted,
    /// The data source is connected and delivering up-to-date flag data.
    Valid,
    /// The data source has been shut down and will not recover.
    Off,
}

/// Detail about a data-source failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// General category of the failure.
    pub kind: ErrorKind,
    /// Numeric code associated with the failure (e.g., an HTTP status), if
    /// applicable.
    pub status_code: Option<u16>,
    /// Human-readable description of the failure.
    pub message: Option<String>,
    /// When the failure occurred.
    pub time: DateTime<Utc>,
}

/// General category of a data-source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A cause that does not fall into any other category.
    Unknown,
    /// An I/O error such as a dropped connection.
    NetworkError,
    /// The service returned an error response.
    ErrorResponse,
    /// The service returned data that could not be processed.
    InvalidData,
    /// The data store failed to hold the received data.
    StoreError,
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ErrorKind::Unknown => "unknown error",
            ErrorKind::NetworkError => "network error",
            ErrorKind::ErrorResponse => "error response",
            ErrorKind::InvalidData => "invalid data",
            ErrorKind::StoreError => "store error",
        };
        write!(f, "{kind}")?;
        if let Some(code) = self.status_code {
            write!(f, " ({code})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// A point-in-time snapshot of the data source's status.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceStatus {
    /// Connectivity state.
    pub state: DataSourceState,
    /// Detail about the most recent failure, if any.
    pub error: Option<ErrorInfo>,
}

impl DataSourceStatus {
    /// A status with the given state and no error detail.
    pub fn new(state: DataSourceState) -> DataSourceStatus {
        DataSourceStatus { state, error: None }
    }
}

/// A changed-flag notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagChange {
    /// Key of the flag whose configuration changed.
    pub key: String,
}

/// Callback invoked for every data-source status change.
///
/// Listeners may be invoked from background execution contexts, concurrently
/// with each other and with foreground status queries.
pub type StatusListener = Box<dyn Fn(DataSourceStatus) + Send + Sync>;

/// Callback invoked for every changed flag.
pub type FlagChangeListener = Box<dyn Fn(FlagChange) + Send + Sync>;

/// The data source's status surface: current status on demand plus a
/// subscription mechanism for status changes.
pub trait DataSourceStatusProvider: Send + Sync {
    /// Whether the data source has ever successfully delivered a full set of
    /// flag data.
    fn is_initialized(&self) -> bool;

    /// The current status.
    fn status(&self) -> DataSourceStatus;

    /// Register a listener for future status changes.
    fn add_status_listener(&self, listener: StatusListener);
}

/// Subscription mechanism for flag-change notifications.
pub trait FlagChangeNotifier: Send + Sync {
    /// Register a listener invoked once per changed flag.
    fn add_flag_change_listener(&self, listener: FlagChangeListener);
}
