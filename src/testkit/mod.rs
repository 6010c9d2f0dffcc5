//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`exchange`]: [`ScriptedExchange`](exchange::ScriptedExchange), an
//!   in-memory [`ExchangeAdapter`](crate::port::ExchangeAdapter) with
//!   scripted instruments, bars, failures and delays.
//! - [`notifier`]: [`RecordingChannel`](notifier::RecordingChannel), an
//!   alert channel that records what it was asked to deliver.
//! - [`clock`]: [`FixedClock`](clock::FixedClock), a settable clock.
//! - [`domain`]: Builders for bars and signals.
//! - [`config`]: Canonical test configurations.

pub mod clock;
pub mod config;
pub mod domain;
pub mod exchange;
pub mod notifier;
