//! Exchange-agnostic domain logic.
//!
//! Everything here is pure: no I/O, no clocks, no locks. Time always comes
//! in as an argument so the rules can be tested at exact instants.

pub mod alert;
pub mod candle;
pub mod dedup;
pub mod error;
pub mod id;
pub mod scan;
pub mod schedule;
pub mod signal;

pub use alert::{Alert, AlertKind};
pub use candle::{select_closed, Candle, Ohlc};
pub use dedup::DedupWindow;
pub use error::DomainError;
pub use id::{ExchangeId, Instrument};
pub use scan::{rank, ScanCycle, ScanError, ScanErrorKind};
pub use schedule::{next_wake, ResetSchedule};
pub use signal::{evaluate, magnitude_pct, Direction, Signal};
