//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │Exchange │            │    Clock    │              │  Channel  │
//! │ Adapter │            │             │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ExchangeAdapter`] - Instrument listing and candle retrieval
//! - [`AlertChannel`] - Alert delivery (push relay, desktop, log)
//! - [`Clock`] - Current UTC time

pub mod outbound;

pub use outbound::clock::Clock;
pub use outbound::exchange::ExchangeAdapter;
pub use outbound::notifier::AlertChannel;
