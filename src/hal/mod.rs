pub mod watchdog;

#[cfg(feature = "atmega128a")]
pub mod timer;

// Re-export commonly used types
pub use watchdog::IdleWatchdog;
#[cfg(feature = "atmega128a")]
pub use watchdog::{Wdt, WdtTimeout};
