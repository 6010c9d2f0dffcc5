//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration. These factories handle dependency
//! injection and wiring.
//!
//! # Submodules
//!
//! - [`exchange`] - Exchange adapter and scan coordinator construction
//! - [`notifier`] - Alert channel and dispatcher construction

pub mod exchange;
pub mod notifier;
