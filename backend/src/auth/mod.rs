//! Authentication module
//!
//! Provides credential verification, JWT issuance/verification and the
//! request authorization gate.

mod clock;
mod credentials;
mod error;
mod gate;
mod middleware;
mod password;
mod store;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::CredentialVerifier;
pub use error::AuthError;
pub use gate::{AuthGate, AuthUser};
pub use middleware::auth_middleware;
pub use password::PasswordService;
pub use store::{IdentityRecord, IdentityStore, InMemoryIdentityStore};
pub use token::{Claims, JwtKeys, TokenService, VerifiedToken};
