use subtle::ConstantTimeEq;

use crate::AuthError;

/// The single admin login, holding only a bcrypt hash of the password.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password_hash: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn from_password(
        email: impl Into<String>,
        password: &str,
        cost: u32,
    ) -> Result<Self, AuthError> {
        let hash = bcrypt::hash(password, cost)?;
        Ok(Self::new(email, hash))
    }

    /// Prefers a non-empty hash; otherwise hashes the plaintext secret.
    pub fn resolve(
        email: &str,
        password_hash: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthError> {
        match (
            password_hash.filter(|h| !h.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) {
            (Some(hash), _) => Ok(Self::new(email, hash)),
            (None, Some(password)) => Self::from_password(email, password, bcrypt::DEFAULT_COST),
            (None, None) => Err(AuthError::MissingSecret),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn matches(&self, email: &str, password: &str) -> bool {
        let email_ok: bool = self.email.as_bytes().ct_eq(email.as_bytes()).into();
        let password_ok = bcrypt::verify(password, &self.password_hash).unwrap_or(false);
        email_ok && password_ok
    }
}
