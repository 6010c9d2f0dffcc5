//! Outbound adapters (driven side).

pub mod clock;
pub mod exchange;
pub mod notifier;
