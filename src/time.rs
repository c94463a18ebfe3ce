//! System time base: free-running millisecond tick counter and blocking delay
//!
//! The scheduler does not own a timer. An external source (typically a 1 ms
//! timer interrupt, see `hal::timer` on AVR) increments a [`TickCounter`] and
//! the scheduler only ever reads it. The counter wraps; all comparisons
//! against it must go through [`ticks_elapsed`] so wraparound is handled.

use core::sync::atomic::{AtomicU32, Ordering};

/// Free-running wrapping millisecond counter.
///
/// Meant to live in a `static` shared between a timer ISR (writer) and the
/// scheduler (reader). Relaxed ordering is sufficient: there is a single
/// writer and the reader only needs an eventually-fresh value.
pub struct TickCounter {
    ms: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ms: AtomicU32::new(0),
        }
    }

    /// Advance by one millisecond. Called from the tick interrupt.
    #[inline]
    pub fn tick(&self) {
        self.ms.fetch_add(1, Ordering::Relaxed);
    }

    /// Advance by `n` milliseconds, for coarser tick sources.
    #[inline]
    pub fn advance(&self, n: u32) {
        self.ms.fetch_add(n, Ordering::Relaxed);
    }

    /// Current tick value in milliseconds.
    #[inline]
    pub fn now(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }

    /// Reset to zero. Done once by `Scheduler::init`.
    #[inline]
    pub fn reset(&self) {
        self.ms.store(0, Ordering::Relaxed);
    }

    /// Busy-wait until at least `duration` milliseconds have elapsed.
    ///
    /// Blocks the caller outright; called from a task body it stalls the
    /// whole dispatch loop and the watchdog signal with it.
    pub fn delay_ms(&self, duration: u32) {
        let deadline = self.now().wrapping_add(duration);
        while !ticks_elapsed(self.now(), deadline) {
            core::hint::spin_loop();
        }
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraparound-tolerant deadline test: true once `now` has reached or passed
/// `deadline`, even across a counter overflow. The difference is interpreted
/// as a signed 32-bit quantity, so deadlines up to ~24 days out are ordered
/// correctly.
#[inline]
pub fn ticks_elapsed(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) as i32 >= 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    #[test]
    fn counter_starts_at_zero_and_ticks() {
        let ticks = TickCounter::new();
        assert_eq!(ticks.now(), 0);
        ticks.tick();
        ticks.tick();
        assert_eq!(ticks.now(), 2);
        ticks.advance(98);
        assert_eq!(ticks.now(), 100);
        ticks.reset();
        assert_eq!(ticks.now(), 0);
    }

    #[test]
    fn counter_wraps() {
        let ticks = TickCounter::new();
        ticks.advance(u32::MAX);
        ticks.advance(6);
        assert_eq!(ticks.now(), 5);
    }

    #[test]
    fn elapsed_is_wraparound_tolerant() {
        assert!(ticks_elapsed(100, 100));
        assert!(ticks_elapsed(101, 100));
        assert!(!ticks_elapsed(99, 100));
        // deadline set just before the wrap, counter already past it
        assert!(ticks_elapsed(3, u32::MAX - 5));
        assert!(!ticks_elapsed(u32::MAX - 10, u32::MAX - 5));
    }

    #[test]
    fn delay_blocks_until_deadline() {
        let ticks = TickCounter::new();
        let done = AtomicBool::new(false);
        thread::scope(|s| {
            s.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    ticks.tick();
                    thread::yield_now();
                }
            });
            ticks.delay_ms(50);
            assert!(ticks.now() >= 50);
            done.store(true, Ordering::Relaxed);
        });
    }
}
