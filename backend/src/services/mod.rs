//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod github;
pub mod post;
pub mod profile;
pub mod user;

pub use github::GithubClient;
pub use post::PostService;
pub use profile::{ProfileService, UpsertAction};
pub use user::UserService;
