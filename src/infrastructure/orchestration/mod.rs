//! Scan loop orchestration.

pub mod runtime;

pub use runtime::{run, ScanLoop};
