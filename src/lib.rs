//! Tracks how many days have passed since the last soda.
//!
//! The toolkit-free core: a single-value [`storage::DateStore`], whole-day
//! arithmetic in [`streak`], and the [`counter::Counter`] that ties them to
//! the label shown in the window.

pub mod config;
pub mod counter;
pub mod error;
pub mod storage;
pub mod streak;

pub use config::Settings;
pub use counter::{Counter, CounterState, Submission};
pub use error::{ConfigError, CounterError, StorageError};
pub use storage::DateStore;
pub use streak::{Clock, FixedClock, SystemClock, days_since};
