/// Represents a result type for operations in this crate.
///
/// This `Result` type is a standard Rust `Result` type where the error
/// variant is defined by the crate-specific [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors surfaced by the provider.
///
/// Data-conversion problems are never surfaced as errors (they are logged and
/// the conversion degrades instead); only lifecycle failures propagate to the
/// caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The underlying data source reported a permanent shutdown before the
    /// provider became ready.
    #[error("provider shutdown")]
    ProviderShutdown,

    /// A status listener panicked while holding the lifecycle state lock.
    /// This should normally never happen.
    #[error("status listener panicked")]
    StatusListenerPanicked,
}
