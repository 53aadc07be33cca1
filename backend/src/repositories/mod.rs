//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod post;
pub mod profile;
pub mod user;

pub use post::{NewEntry, PostRepository};
pub use profile::{ProfileRepository, ProfileSection, UpsertProfile};
pub use user::{is_unique_violation, CreateUser, UserRecord, UserRepository};
