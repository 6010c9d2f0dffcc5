//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: exchange REST APIs,
//! notification channels, and the wall clock.

pub mod clock;
pub mod exchange;
pub mod notifier;
