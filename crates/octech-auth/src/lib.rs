pub mod credentials;
pub mod manager;
pub mod profile;

pub use credentials::Credentials;
pub use manager::{LoginGrant, SessionManager};
pub use profile::{AdminProfile, AdminSession, ADMIN_ROLE};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("not authenticated")]
    Unauthenticated,
    #[error("session expired")]
    SessionExpired,
    #[error("no admin password or password hash configured")]
    MissingSecret,
    #[error("credential check did not complete: {0}")]
    Blocking(String),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
