pub mod entities;
pub mod error;
pub mod profile;

pub use entities::{user_initials, User, Workspace};
pub use error::DomainError;
pub use profile::Profile;
