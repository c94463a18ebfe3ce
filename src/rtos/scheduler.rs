//! Cooperative round-robin task scheduler
//!
//! Registered tasks form a circular list in registration order; the dispatch
//! loop visits one slot per iteration and fires the task there when its due
//! time has elapsed. There is no preemption and no priority: a task body
//! runs to completion on the caller's stack before the loop moves on.
//!
//! Descriptors live in a fixed arena inside the scheduler and are addressed
//! by [`TaskHandle`]; the ring is a chain of slot indexes, so the scheduler
//! alone owns the list topology and no caller-held pointer can dangle.

use log::{debug, trace};

use crate::config::{DEFAULT_INTERVAL_MS, MAX_INTERVAL_MS, MAX_TASKS};
use crate::rtos::task::{TaskFn, TaskHandle, TaskSlot, TaskStatus};
use crate::time::{ticks_elapsed, TickCounter};

const EMPTY_SLOT: Option<TaskSlot> = None;

/// Scheduler instance.
///
/// Borrows the externally driven [`TickCounter`]; nothing here owns a timer
/// or spawns anything. Create with [`Scheduler::new`], then [`init`], then
/// register tasks and hand control to [`run`].
///
/// All operations except `new` and `init` fail fast (return `false` /
/// `None`) until `init` has been called.
///
/// [`init`]: Scheduler::init
/// [`run`]: Scheduler::run
pub struct Scheduler<'t> {
    ticks: &'t TickCounter,
    initialized: bool,
    slots: [Option<TaskSlot>; MAX_TASKS],
    /// Logical head of the ring; insertion anchor and start of walks.
    first: Option<u8>,
    /// Next slot the dispatch loop will examine.
    cursor: Option<u8>,
    task_count: u8,
}

impl<'t> Scheduler<'t> {
    pub const fn new(ticks: &'t TickCounter) -> Self {
        Self {
            ticks,
            initialized: false,
            slots: [EMPTY_SLOT; MAX_TASKS],
            first: None,
            cursor: None,
            task_count: 0,
        }
    }

    /// Reset the scheduler: empty ring, zero tasks, tick counter back to
    /// zero. Idempotent; calling it again discards every registered task.
    pub fn init(&mut self) {
        self.initialized = true;
        self.slots = [EMPTY_SLOT; MAX_TASKS];
        self.first = None;
        self.cursor = None;
        self.task_count = 0;
        self.ticks.reset();
        debug!("scheduler initialized");
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> u8 {
        self.task_count
    }

    /// Register a task.
    ///
    /// The task is appended to the ring immediately before the head, so
    /// dispatch order is registration order. An `interval_ms` outside
    /// `1..=MAX_INTERVAL_MS` is replaced with [`DEFAULT_INTERVAL_MS`] here
    /// and only here; `modify_task` stores intervals verbatim.
    ///
    /// With `immediate` set the task is due right away; otherwise its first
    /// due time is one full interval out.
    ///
    /// Fails (`None`) when uninitialized or when [`MAX_TASKS`] tasks are
    /// already registered.
    pub fn add_task(
        &mut self,
        callback: TaskFn,
        interval_ms: u32,
        status: TaskStatus,
        immediate: bool,
    ) -> Option<TaskHandle> {
        if !self.initialized || self.task_count as usize == MAX_TASKS {
            return None;
        }

        let interval = if interval_ms < 1 || interval_ms > MAX_INTERVAL_MS {
            DEFAULT_INTERVAL_MS
        } else {
            interval_ms
        };

        let idx = self.free_slot()?;
        let next = match self.first {
            Some(first) => {
                // splice in at the tail: the head's predecessor now links to
                // the new slot, the new slot links back to the head
                let tail = self.pred_of(first)?;
                if let Some(t) = self.slots[tail as usize].as_mut() {
                    t.next = idx;
                }
                first
            }
            None => {
                // sole member: self-loop
                self.first = Some(idx);
                self.cursor = Some(idx);
                idx
            }
        };

        let now = self.ticks.now();
        let next_due = now.wrapping_add(if immediate { 0 } else { interval });
        self.slots[idx as usize] = Some(TaskSlot {
            callback,
            interval,
            next_due,
            status,
            next,
        });
        self.task_count += 1;
        debug!("task {} registered, interval {} ms", idx, interval);
        Some(TaskHandle(idx))
    }

    /// Unlink a task from the ring and free its slot.
    ///
    /// Predecessor link, head pointer and dispatch cursor are all repaired
    /// together, so removing the head (or the task the cursor is parked on,
    /// including self-removal from inside a task body) leaves the ring
    /// closed and dispatch continuing at the successor.
    ///
    /// Fails when uninitialized, when the ring is empty, or when `handle`
    /// does not name a registered task.
    pub fn remove_task(&mut self, handle: TaskHandle) -> bool {
        if !self.initialized || self.task_count == 0 {
            return false;
        }
        let idx = handle.0;
        let succ = match self.slots[idx as usize] {
            Some(slot) => slot.next,
            None => return false,
        };
        let pred = match self.pred_of(idx) {
            Some(pred) => pred,
            None => return false,
        };

        if self.task_count == 1 {
            self.first = None;
            self.cursor = None;
        } else {
            if let Some(p) = self.slots[pred as usize].as_mut() {
                p.next = succ;
            }
            if self.first == Some(idx) {
                self.first = Some(succ);
            }
            if self.cursor == Some(idx) {
                self.cursor = Some(succ);
            }
        }

        self.slots[idx as usize] = None;
        self.task_count -= 1;
        debug!("task {} removed", idx);
        true
    }

    /// Drop every registered task at once. Unlike [`init`](Scheduler::init)
    /// this leaves the tick counter running.
    pub fn clear_all(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.slots = [EMPTY_SLOT; MAX_TASKS];
        self.first = None;
        self.cursor = None;
        self.task_count = 0;
        debug!("all tasks cleared");
        true
    }

    /// Stop a task from being dispatched. Its due time is left untouched,
    /// so pausing an already-paused task changes nothing.
    pub fn pause_task(&mut self, handle: TaskHandle) -> bool {
        if !self.initialized {
            return false;
        }
        match self.slots[handle.0 as usize].as_mut() {
            Some(t) => {
                t.status = TaskStatus::Paused;
                true
            }
            None => false,
        }
    }

    /// Put a task back into the given status. Resuming to `Scheduled`
    /// restarts its period from now, reusing the stored interval; resuming
    /// to `OneTime` keeps whatever due time the task already had.
    pub fn resume_task(&mut self, handle: TaskHandle, status: TaskStatus) -> bool {
        if !self.initialized {
            return false;
        }
        let now = self.ticks.now();
        match self.slots[handle.0 as usize].as_mut() {
            Some(t) => {
                t.status = status;
                if status == TaskStatus::Scheduled {
                    t.next_due = now.wrapping_add(t.interval);
                }
                true
            }
            None => false,
        }
    }

    /// Overwrite a task's interval and status. A runnable status restarts
    /// the period from now; `Paused` zeroes the due time. The interval is
    /// stored as given, without the registration-time range clamp.
    pub fn modify_task(&mut self, handle: TaskHandle, interval_ms: u32, status: TaskStatus) -> bool {
        if !self.initialized {
            return false;
        }
        let now = self.ticks.now();
        match self.slots[handle.0 as usize].as_mut() {
            Some(t) => {
                t.interval = interval_ms;
                t.status = status;
                t.next_due = match status {
                    TaskStatus::Scheduled | TaskStatus::OneTime => now.wrapping_add(interval_ms),
                    TaskStatus::Paused => 0,
                };
                true
            }
            None => false,
        }
    }

    /// Stored status of a task, or `None` when the scheduler is
    /// uninitialized or the handle names no registered task.
    pub fn task_status(&self, handle: TaskHandle) -> Option<TaskStatus> {
        if !self.initialized {
            return None;
        }
        self.slots[handle.0 as usize].as_ref().map(|t| t.status)
    }

    /// One dispatch iteration: examine the slot under the cursor, fire it
    /// if due, advance the cursor one ring position. No-op on an empty
    /// ring.
    ///
    /// A `Scheduled` task is rescheduled *before* its callback runs, so the
    /// body observes the next cycle's target and its own execution time
    /// does not shift its period. A `OneTime` task runs and then pauses
    /// itself.
    ///
    /// Task bodies get `&mut Scheduler` and may add, remove, pause, resume
    /// or modify tasks (themselves included); the cursor is re-checked
    /// afterwards so such reentrant mutation never makes dispatch skip or
    /// revisit a slot.
    pub fn poll(&mut self) {
        let cur = match self.cursor {
            Some(cur) => cur,
            None => return,
        };
        let idx = cur as usize;
        let now = self.ticks.now();

        let fire = match self.slots[idx].as_mut() {
            Some(t) if t.status != TaskStatus::Paused && ticks_elapsed(now, t.next_due) => {
                if t.status == TaskStatus::Scheduled {
                    t.next_due = now.wrapping_add(t.interval);
                    Some((t.callback, false))
                } else {
                    Some((t.callback, true))
                }
            }
            _ => None,
        };

        if let Some((callback, one_shot)) = fire {
            trace!("dispatch slot {} at {} ms", cur, now);
            callback(self);
            if one_shot {
                // the body may have removed or reconfigured itself; only a
                // still-one-shot occupant gets parked
                if let Some(t) = self.slots[idx].as_mut() {
                    if t.status == TaskStatus::OneTime {
                        t.status = TaskStatus::Paused;
                    }
                }
            }
        }

        // advance one ring slot, unless a reentrant removal or clear already
        // moved the cursor off this slot
        if self.cursor == Some(cur) {
            if let Some(t) = self.slots[idx].as_ref() {
                self.cursor = Some(t.next);
            }
        }
    }

    /// The dispatch loop: poll forever, feeding the watchdog exactly once
    /// per iteration whether or not anything fired. Intended as the entire
    /// main loop of the host program; it never returns.
    pub fn run<W>(&mut self, watchdog: &mut W) -> !
    where
        W: embedded_hal::watchdog::Watchdog,
    {
        loop {
            self.poll();
            watchdog.feed();
        }
    }

    /// Lowest vacant arena slot.
    fn free_slot(&self) -> Option<u8> {
        self.slots
            .iter()
            .position(|s| s.is_none())
            .map(|idx| idx as u8)
    }

    /// Ring predecessor of `idx` (itself for a sole member). `None` when
    /// `idx` is not reachable from the head, which bounds every walk to one
    /// lap instead of looping forever on a bad handle.
    fn pred_of(&self, idx: u8) -> Option<u8> {
        let mut cur = self.first?;
        for _ in 0..self.task_count {
            let slot = self.slots[cur as usize].as_ref()?;
            if slot.next == idx {
                return Some(cur);
            }
            cur = slot.next;
        }
        None
    }
}

/// Fluent registration sugar over [`Scheduler::add_task`].
pub struct TaskBuilder {
    callback: TaskFn,
    interval_ms: u32,
    status: TaskStatus,
    immediate: bool,
}

impl TaskBuilder {
    pub fn new(callback: TaskFn) -> Self {
        Self {
            callback,
            interval_ms: DEFAULT_INTERVAL_MS,
            status: TaskStatus::Scheduled,
            immediate: false,
        }
    }

    pub fn interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Run once when due, then self-pause.
    pub fn one_time(mut self) -> Self {
        self.status = TaskStatus::OneTime;
        self
    }

    /// Register parked; the task will not run until resumed.
    pub fn paused(mut self) -> Self {
        self.status = TaskStatus::Paused;
        self
    }

    /// First due time is now instead of one interval out.
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }

    pub fn register(self, scheduler: &mut Scheduler<'_>) -> Option<TaskHandle> {
        scheduler.add_task(self.callback, self.interval_ms, self.status, self.immediate)
    }
}
