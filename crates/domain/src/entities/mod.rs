//! Domain entities for the dashboard data model

mod user;
mod workspace;

pub use user::{user_initials, User};
pub use workspace::Workspace;
