use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdminProfile {
    pub email: String,
    pub role: String,
}

impl AdminProfile {
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub profile: AdminProfile,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub ttl_seconds: i64,
}

impl AdminSession {
    pub fn new(profile: AdminProfile, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            profile,
            created_at: now,
            last_active: now,
            ttl_seconds,
        }
    }

    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now() - self.last_active;
        elapsed.num_seconds() >= self.ttl_seconds
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}
