pub mod project;
pub mod task;
pub mod user;

use uuid::Uuid;

pub use project::{NewProject, Project, ProjectChanges};
pub use task::{NewTask, Task, TaskChanges};
pub use user::{Profile, User};

/// A record with exactly one creator, who alone may modify or delete it.
pub trait Owned {
    /// Human-readable record kind used in error messages.
    const KIND: &'static str;

    fn creator(&self) -> Uuid;
}
