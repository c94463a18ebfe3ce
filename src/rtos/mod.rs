pub mod scheduler;
pub mod task;

// Re-export commonly used types
pub use scheduler::{Scheduler, TaskBuilder};
pub use task::{TaskFn, TaskHandle, TaskStatus};
