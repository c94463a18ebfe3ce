//! Configuration constants for the scheduler

/// Maximum number of registered tasks. Handles are slot indexes stored in a
/// `u8`, so 255 is the hard ceiling; RAM will run out long before that on
/// most parts.
pub const MAX_TASKS: usize = 255;

/// Longest accepted task interval in milliseconds (one hour).
pub const MAX_INTERVAL_MS: u32 = 3_600_000;

/// Interval substituted at registration when the requested one is out of
/// range.
pub const DEFAULT_INTERVAL_MS: u32 = 50;

/// Tick counter granularity in Hz. The external time source is expected to
/// call [`TickCounter::tick`](crate::time::TickCounter::tick) at this rate;
/// the AVR port derives its Timer0 reload value from it.
pub const TICK_HZ: u32 = 1000;

/// CPU frequency in Hz (AVR port).
pub const CPU_FREQ_HZ: u32 = 16_000_000;
