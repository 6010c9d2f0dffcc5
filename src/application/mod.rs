//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the scan-and-alert use case.

pub mod dedup;
pub mod dispatch;
pub mod pacing;
pub mod registry;
pub mod scanner;

pub use dedup::DedupTracker;
pub use dispatch::{ChannelOutcome, NotificationDispatcher};
pub use pacing::Pacer;
pub use registry::{RegistryRefresh, SymbolRegistry};
pub use scanner::{ScanCoordinator, ScanSettings};
