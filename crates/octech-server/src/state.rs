use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use octech_auth::{Credentials, SessionManager};
use octech_core::{
    fixtures, AppointmentBook, ChatRegistry, EmailSender, LoggingEmailSender, LoggingSmsSender,
    SiteConfig, SmsSender,
};
use octech_provider::{ChatCompletionClient, OpenAiProvider};
use octech_schema::Client;
use tokio::sync::RwLock;

/// Shared application state accessible from all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub chats: Arc<ChatRegistry>,
    pub appointments: Arc<RwLock<AppointmentBook>>,
    /// Read-only client directory shown on the dashboard.
    pub clients: Arc<Vec<Client>>,
    pub auth: Arc<SessionManager>,
    pub assistant: Arc<ChatCompletionClient>,
    pub email: Arc<dyn EmailSender>,
    pub sms: Arc<dyn SmsSender>,
}

impl AppState {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let credentials = Credentials::resolve(
            &config.auth.admin_email,
            config.auth.password_hash.as_deref(),
            config.auth.password.as_deref(),
        )
        .context("failed to resolve admin credentials")?;

        let provider = Arc::new(OpenAiProvider::new(
            config.assistant.api_key.clone(),
            config.assistant.api_base.clone(),
        ));
        if !provider.has_api_key() {
            tracing::warn!("assistant api key is empty; assistant replies will fall back to the apology");
        }

        let delay = config.notifications.delay();
        Ok(Self {
            chats: Arc::new(
                ChatRegistry::new(config.chat.delays()).with_idle_ttl(config.chat.idle_ttl()),
            ),
            appointments: Arc::new(RwLock::new(AppointmentBook::new(fixtures::appointments(
                Utc::now(),
            )))),
            clients: Arc::new(fixtures::clients()),
            auth: Arc::new(SessionManager::new(
                credentials,
                config.auth.session_ttl_seconds,
            )),
            assistant: Arc::new(ChatCompletionClient::new(
                provider,
                config.assistant.model.clone(),
                config.assistant.system_prompt.clone(),
                config.assistant.max_tokens,
            )),
            email: Arc::new(LoggingEmailSender::new(delay)),
            sms: Arc::new(LoggingSmsSender::new(delay)),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use chrono::{DateTime, TimeZone};
    use octech_core::ChatDelays;

    use super::*;

    pub const ADMIN_EMAIL: &str = "admin@example.com";
    pub const ADMIN_PASSWORD: &str = "password123";

    /// State with fixture data, cheap bcrypt, zero send delays and an
    /// assistant without an api key.
    pub fn state_with_delays(delays: ChatDelays) -> AppState {
        let credentials = Credentials::from_password(ADMIN_EMAIL, ADMIN_PASSWORD, 4).unwrap();
        let provider = Arc::new(OpenAiProvider::new("", "http://127.0.0.1:9"));

        AppState {
            chats: Arc::new(ChatRegistry::new(delays)),
            appointments: Arc::new(RwLock::new(AppointmentBook::new(fixtures::appointments(
                now(),
            )))),
            clients: Arc::new(fixtures::clients()),
            auth: Arc::new(SessionManager::new(credentials, 3600)),
            assistant: Arc::new(ChatCompletionClient::new(provider, "gpt-3.5-turbo", "p", 150)),
            email: Arc::new(LoggingEmailSender::new(Duration::ZERO)),
            sms: Arc::new(LoggingSmsSender::new(Duration::ZERO)),
        }
    }

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    pub fn state() -> AppState {
        state_with_delays(ChatDelays::immediate())
    }

    pub async fn admin_token(state: &AppState) -> String {
        state
            .auth
            .login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap()
            .token
    }
}
