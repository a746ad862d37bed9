#![warn(clippy::uninlined_format_args)]

pub mod loader;
pub mod observer;
pub mod store;

pub use loader::{DEFAULT_GROUP, LedgerFileLoader, LoadError, LoadSummary};
pub use observer::TracingObserver;
pub use store::InMemoryLedgerStore;
