pub mod note;
pub mod project;
pub mod task;
pub mod token;
pub mod user;

pub use note::Note;
pub use project::{Project, ProjectDetail};
pub use task::{Task, TaskStatus};
pub use token::Token;
pub use user::{Principal, User};
