//! 1 ms system tick on Timer0 (ATmega128A port)
//!
//! Wires the external time source the scheduler expects: Timer0 overflows
//! every millisecond and its ISR advances [`TICKS`]. The host passes
//! `&TICKS` to [`Scheduler::new`](crate::rtos::Scheduler::new).

use avr_device::atmega128a::TC0;

use crate::config::{CPU_FREQ_HZ, TICK_HZ};
use crate::time::TickCounter;

/// Tick counter fed by the Timer0 overflow interrupt.
pub static TICKS: TickCounter = TickCounter::new();

// Timer0 counts at CPU_FREQ_HZ / 64; one overflow per tick period.
// 16 MHz / 64 = 250 kHz, so 250 counts per 1 ms tick.
const COUNTS_PER_TICK: u32 = CPU_FREQ_HZ / 64 / TICK_HZ;
const TICK_RELOAD: u8 = (256 - COUNTS_PER_TICK) as u8;

// an 8-bit timer must be able to count a full tick period
const _: () = assert!(COUNTS_PER_TICK > 0 && COUNTS_PER_TICK <= 256);

pub struct SystemTick {
    _private: (),
}

impl SystemTick {
    /// Configure Timer0 for a [`TICK_HZ`] overflow and enable its
    /// interrupt. Global interrupts must still be enabled by the caller.
    pub fn start() -> Self {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt0.write(|w| w.bits(TICK_RELOAD));
            // clk/64 prescaler
            (*p).tccr0.write(|w| w.bits(0x03));
            // overflow interrupt enable
            (*p).timsk.modify(|r, w| w.bits(r.bits() | 1));
        }
        Self { _private: () }
    }

    pub fn stop(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).timsk.modify(|r, w| w.bits(r.bits() & !1));
            (*p).tccr0.write(|w| w.bits(0));
        }
    }
}

#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    // reload so the next overflow lands one tick period out
    unsafe {
        (*TC0::ptr()).tcnt0.write(|w| w.bits(TICK_RELOAD));
    }
    TICKS.tick();
}
