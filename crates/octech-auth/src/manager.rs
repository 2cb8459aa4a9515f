use std::collections::HashMap;
use std::sync::Arc;

use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::task;

use crate::{AdminProfile, AdminSession, AuthError, Credentials};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub user: AdminProfile,
}

/// Checks the admin credential and tracks the sessions it issues.
///
/// Tokens are never stored; the map is keyed by their SHA-256 digest.
/// The bcrypt check runs on the blocking pool.
pub struct SessionManager {
    credentials: Arc<Credentials>,
    sessions: RwLock<HashMap<String, AdminSession>>,
    ttl_seconds: i64,
}

impl SessionManager {
    pub fn new(credentials: Credentials, ttl_seconds: i64) -> Self {
        Self {
            credentials: Arc::new(credentials),
            sessions: RwLock::new(HashMap::new()),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// A mismatch leaves the session table untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let credentials = Arc::clone(&self.credentials);
        let (given_email, given_password) = (email.to_string(), password.to_string());
        let matched = task::spawn_blocking(move || {
            credentials.matches(&given_email, &given_password)
        })
        .await
        .map_err(|e| AuthError::Blocking(e.to_string()))?;

        if !matched {
            tracing::warn!("admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token();
        let profile = AdminProfile::admin(self.credentials.email());
        let session = AdminSession::new(profile.clone(), self.ttl_seconds);

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(token_digest(&token), session);
        tracing::info!(email = %profile.email, "admin logged in");

        Ok(LoginGrant {
            token,
            user: profile,
        })
    }

    pub async fn verify(&self, token: &str) -> Result<AdminProfile, AuthError> {
        let digest = token_digest(token);
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&digest) else {
            return Err(AuthError::Unauthenticated);
        };

        if session.is_expired() {
            sessions.remove(&digest);
            return Err(AuthError::SessionExpired);
        }

        session.touch();
        Ok(session.profile.clone())
    }

    /// Returns whether a session existed for the token.
    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(&token_digest(token));
        if let Some(session) = &removed {
            tracing::info!(email = %session.profile.email, "admin logged out");
        }
        removed.is_some()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_expired())
            .count()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
