pub mod subtask;
pub mod task;
pub mod timestamp;
pub mod user;

pub use subtask::{NewSubtask, Subtask, SubtaskChanges};
pub use task::{NewTask, Task, TaskChanges, TaskPriority, TaskStats, TaskStatus, UnknownVariant};
pub use user::{NewUser, User, UserProfile};
