//! User domain
//!
//! Identity records, their public projection, and the storage contract the
//! authentication workflow depends on.

mod entity;
mod repository;

pub use entity::{NewUser, User, UserId, UserProfile};
pub use repository::{RepositoryError, UserRepository};

#[cfg(test)]
pub use repository::MockUserRepository;
