//! Watchdog collaborators for the dispatch loop
//!
//! [`Scheduler::run`](crate::rtos::Scheduler::run) feeds an
//! `embedded_hal::watchdog::Watchdog` once per iteration. On AVR the
//! hardware watchdog below is the real thing; everywhere else (or while
//! bringing a board up) [`IdleWatchdog`] satisfies the bound without side
//! effects.

use embedded_hal::watchdog::Watchdog;

/// No-op watchdog for targets without one.
pub struct IdleWatchdog;

impl Watchdog for IdleWatchdog {
    #[inline]
    fn feed(&mut self) {}
}

#[cfg(feature = "atmega128a")]
pub use avr::{Wdt, WdtTimeout};

#[cfg(feature = "atmega128a")]
mod avr {
    use avr_device::atmega128a::WDT;
    use embedded_hal::watchdog::Watchdog;

    #[derive(Clone, Copy)]
    #[repr(u8)]
    pub enum WdtTimeout {
        Ms16 = 0,
        Ms32 = 1,
        Ms64 = 2,
        Ms125 = 3,
        Ms250 = 4,
        Ms500 = 5,
        Ms1000 = 6,
        Ms2000 = 7,
    }

    /// Hardware watchdog of the ATmega128A.
    pub struct Wdt {
        _private: (),
    }

    impl Wdt {
        #[inline]
        pub fn new() -> Self {
            Self { _private: () }
        }

        #[inline]
        pub fn start(&mut self, timeout: WdtTimeout) {
            unsafe {
                let p = WDT::ptr();
                // Enable change bit and system reset mode
                (*p).wdtcr.write(|w| w.bits(0x18));
                // Set timeout and enable watchdog
                (*p).wdtcr.write(|w| w.bits(0x08 | timeout as u8));
            }
        }

        #[inline]
        pub fn disable(&mut self) {
            unsafe {
                let p = WDT::ptr();
                // Timed sequence to disable watchdog
                (*p).wdtcr.write(|w| w.bits(0x18));
                (*p).wdtcr.write(|w| w.bits(0x00));
            }
        }
    }

    impl Watchdog for Wdt {
        #[inline]
        fn feed(&mut self) {
            unsafe {
                avr_device::asm::wdr();
            }
        }
    }

    impl Default for Wdt {
        fn default() -> Self {
            Self::new()
        }
    }
}
