//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, component wiring, and the scan loop.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`orchestration`] - Scan loop lifecycle

pub mod config;
pub mod factory;
pub mod orchestration;
