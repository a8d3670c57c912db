mod project;
mod session;

pub use project::{Project, ProjectFields};
pub use session::{AuthUser, Session};
