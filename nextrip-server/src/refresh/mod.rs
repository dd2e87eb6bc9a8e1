//! Periodic refresh of the selected journey's departure boards.

mod cycle;
mod provider;
mod session;

pub use cycle::{CycleReport, RefreshConfig, RefreshError, Refresher, fetch_snapshot};
pub use provider::{BoardProvider, BoardSource};
pub use session::{RefreshStatus, Session, SharedSession};
