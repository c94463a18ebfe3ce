//! # ukernel
//!
//! A cooperative, non-preemptive task scheduler for microcontrollers. This
//! is not an RTOS and does not try to be one: there is no context switching,
//! no per-task stack and no priority. Register a handful of periodic or
//! one-shot tasks and let the dispatch loop call them round-robin whenever
//! their interval has elapsed. Task capacity is bounded at 255, but memory
//! will run out long before that on most parts.
//!
//! ```no_run
//! use ukernel::{Scheduler, TaskBuilder, TickCounter};
//! use ukernel::hal::IdleWatchdog;
//!
//! static TICKS: TickCounter = TickCounter::new(); // advanced by a 1 ms ISR
//!
//! fn blink(_: &mut Scheduler<'_>) { /* toggle a pin */ }
//!
//! let mut sched = Scheduler::new(&TICKS);
//! sched.init();
//! TaskBuilder::new(blink).interval_ms(500).register(&mut sched);
//! sched.run(&mut IdleWatchdog) // never returns
//! ```
//!
//! The millisecond tick source and the watchdog are external collaborators:
//! the scheduler only reads the [`TickCounter`] and only calls
//! `Watchdog::feed` once per loop iteration. On the ATmega128A the
//! `atmega128a` feature provides both (`hal::timer`, `hal::watchdog`).

#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod hal;
pub mod rtos;
pub mod time;

pub use rtos::{Scheduler, TaskBuilder, TaskFn, TaskHandle, TaskStatus};
pub use time::TickCounter;
