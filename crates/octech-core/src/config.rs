use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::{ChatDelays, DEFAULT_IDLE_TTL};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful IT support assistant for OC Tech Support, a company that provides IT services to small businesses and home clients in Orange County. Your name is TechBot. Keep responses brief and focused on IT support topics. Services include network setup, computer repair, security camera installation, and Wi-Fi optimization. If asked about pricing, mention that it varies by service and suggest booking a consultation. Business hours are Monday-Friday 8am-6pm.";

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_handoff_connect_delay_ms() -> u64 {
    2000
}

fn default_idle_ttl_seconds() -> u64 {
    DEFAULT_IDLE_TTL.as_secs()
}

fn default_notification_delay_ms() -> u64 {
    500
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key() -> String {
    "${OPENAI_API_KEY}".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_session_ttl_seconds() -> i64 {
    8 * 60 * 60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    #[serde(default = "default_handoff_connect_delay_ms")]
    pub handoff_connect_delay_ms: u64,
    #[serde(default = "default_idle_ttl_seconds")]
    pub idle_ttl_seconds: u64,
}

impl ChatConfig {
    pub fn delays(&self) -> ChatDelays {
        ChatDelays {
            reply: Duration::from_millis(self.reply_delay_ms),
            handoff_connect: Duration::from_millis(self.handoff_connect_delay_ms),
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_seconds)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            handoff_connect_delay_ms: default_handoff_connect_delay_ms(),
            idle_ttl_seconds: default_idle_ttl_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_notification_delay_ms")]
    pub delay_ms: u64,
}

impl NotificationsConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_notification_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Usually `${OPENAI_API_KEY}`; resolved at load time.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: default_api_key(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub admin_email: String,
    /// bcrypt hash; takes precedence over `password`.
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_session_ttl_seconds")]
    pub session_ttl_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    pub auth: AuthConfig,
}

pub fn resolve_env_var(raw: &str) -> String {
    let mut output = String::new();
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);

        let candidate = &rest[start + 2..];
        let Some(end) = candidate.find('}') else {
            output.push_str(&rest[start..]);
            return output;
        };

        let key = &candidate[..end];
        output.push_str(&std::env::var(key).unwrap_or_default());
        rest = &candidate[end + 1..];
    }

    output.push_str(rest);
    output
}

/// Loads `main.yaml` from the config directory.
pub fn load_config(config_dir: &Path) -> Result<SiteConfig> {
    let mut config: SiteConfig = read_yaml_file(&config_dir.join("main.yaml"))?;
    resolve_config_env(&mut config);
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SiteConfig) -> Result<()> {
    if config.auth.admin_email.trim().is_empty() {
        return Err(anyhow!("auth.admin_email must not be empty"));
    }

    let has_secret = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
    if !has_secret(&config.auth.password_hash) && !has_secret(&config.auth.password) {
        return Err(anyhow!(
            "auth requires password_hash or password (did you export the referenced env var?)"
        ));
    }

    if config.auth.session_ttl_seconds <= 0 {
        return Err(anyhow!("auth.session_ttl_seconds must be positive"));
    }

    Ok(())
}

fn read_yaml_file<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse yaml file: {}", path.display()))
}

fn resolve_config_env(config: &mut SiteConfig) {
    config.server.bind = resolve_env_var(&config.server.bind);
    config.assistant.api_base = resolve_env_var(&config.assistant.api_base);
    config.assistant.api_key = resolve_env_var(&config.assistant.api_key);
    config.auth.admin_email = resolve_env_var(&config.auth.admin_email);
    config.auth.password_hash = config.auth.password_hash.as_deref().map(resolve_env_var);
    config.auth.password = config.auth.password.as_deref().map(resolve_env_var);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_main(dir: &Path, content: &str) {
        fs::write(dir.join("main.yaml"), content).unwrap();
    }

    fn fixture_config_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
    }

    #[test]
    fn workspace_config_parses_with_env_placeholders() {
        let config: SiteConfig =
            read_yaml_file(&fixture_config_root().join("main.yaml")).unwrap();
        assert_eq!(config.auth.admin_email, "admin@example.com");
        assert_eq!(config.assistant.api_key, "${OPENAI_API_KEY}");
        assert_eq!(config.chat.reply_delay_ms, 1000);
    }

    #[test]
    fn load_config_applies_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_main(
            tmp.path(),
            "auth:\n  admin_email: admin@example.com\n  password: secret\n",
        );

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:3001");
        assert_eq!(config.chat.delays(), ChatDelays::default());
        assert_eq!(config.chat.idle_ttl(), Duration::from_secs(30 * 60));
        assert_eq!(config.notifications.delay(), Duration::from_millis(500));
        assert_eq!(config.assistant.model, "gpt-3.5-turbo");
        assert_eq!(config.assistant.max_tokens, 150);
        assert_eq!(config.assistant.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.auth.session_ttl_seconds, 8 * 60 * 60);
    }

    #[test]
    fn load_config_resolves_secrets_from_env() {
        std::env::set_var("OCTECH_TEST_ADMIN_PASSWORD", "from-env");
        let tmp = tempfile::TempDir::new().unwrap();
        write_main(
            tmp.path(),
            "auth:\n  admin_email: admin@example.com\n  password: \"${OCTECH_TEST_ADMIN_PASSWORD}\"\n",
        );

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.auth.password.as_deref(), Some("from-env"));
    }

    #[test]
    fn load_config_rejects_missing_secret() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_main(
            tmp.path(),
            "auth:\n  admin_email: admin@example.com\n  password: \"${OCTECH_NONEXISTENT_SECRET_XYZ}\"\n",
        );

        let err = load_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("password_hash or password"));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn resolve_env_var_handles_plain_and_unclosed() {
        assert_eq!(resolve_env_var("plain-value"), "plain-value");
        assert_eq!(resolve_env_var("prefix_${UNCLOSED"), "prefix_${UNCLOSED");
        assert_eq!(resolve_env_var("val=${OCTECH_NONEXISTENT_VAR_XYZ}"), "val=");
        assert_eq!(resolve_env_var(""), "");
    }

    #[test]
    fn resolve_env_var_replaces_placeholder() {
        let expected = std::env::var("PATH").unwrap();
        assert_eq!(resolve_env_var("${PATH}"), expected);
    }
}
