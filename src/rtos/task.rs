//! Task model: status, handles and the slot layout behind them

use crate::rtos::scheduler::Scheduler;

/// A task body. Receives the scheduler so it can reentrantly register,
/// remove, pause or modify tasks (including itself) while it runs.
pub type TaskFn = fn(&mut Scheduler<'_>);

/// Persisted state of a registered task.
///
/// `OneTime` tasks flip themselves to `Paused` after their single run.
/// Immediate start is a registration-time option, not a status; see
/// [`Scheduler::add_task`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TaskStatus {
    /// Skipped by the dispatch loop until resumed.
    Paused,
    /// Runs every `interval` milliseconds.
    Scheduled,
    /// Runs once when due, then pauses itself.
    OneTime,
}

impl ufmt::uDisplay for TaskStatus {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(match self {
            TaskStatus::Paused => "paused",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::OneTime => "one-time",
        })
    }
}

/// Opaque reference to a registered task, returned by
/// [`Scheduler::add_task`]. It names a slot in the scheduler's arena; after
/// the task is removed the handle is stale and every operation taking it
/// reports failure.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TaskHandle(pub(crate) u8);

impl TaskHandle {
    /// Arena slot index, for diagnostics.
    pub fn index(self) -> u8 {
        self.0
    }
}

/// One arena slot. The `next` field is the ring link: the slot index of the
/// successor in dispatch order, always valid while the task is registered
/// (a sole member links to itself).
#[derive(Copy, Clone)]
pub(crate) struct TaskSlot {
    pub callback: TaskFn,
    pub interval: u32,
    pub next_due: u32,
    pub status: TaskStatus,
    pub next: u8,
}
