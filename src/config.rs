// ABOUTME: Configuration loading for chatbox.
// ABOUTME: Reads ~/.chatbox/config.toml, applies env and CLI overrides, and resolves data paths.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable that overrides `backend.url`.
pub const BACKEND_URL_ENV: &str = "CHATBOX_BACKEND_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    pub ui: UiConfig,
    pub voice: VoiceConfig,
}

/// Remote reply endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:4000/chat".to_string(),
            timeout_seconds: 60,
        }
    }
}

/// Keys used in the persisted key/value store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub messages_key: String,
    pub session_key: String,
    pub seen_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            messages_key: "campus_ai_college_msgs_v1".to_string(),
            session_key: "campus_ai_college_session_v1".to_string(),
            seen_key: "campus_ai_seen_v1".to_string(),
        }
    }
}

/// Fixed copy shown in the conversation thread.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub greeting: String,
    pub error_text: String,
    pub placeholder_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: "Welcome to Campus AI — Ask about schedules, events, fees, academics, or general questions!".to_string(),
            error_text: "❌ Cannot reach backend. Please check your server or CORS settings."
                .to_string(),
            placeholder_reply: "⚠️ No reply from server.".to_string(),
        }
    }
}

/// Screen layout variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// The chat fills the whole terminal.
    #[default]
    Full,
    /// The chat panel opens and closes; auto-opens on the first run.
    Collapsible,
}

/// Presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub layout: Layout,
    pub suggestions: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Campus AI".to_string(),
            layout: Layout::Full,
            suggestions: vec![
                "Exam schedule".to_string(),
                "Upcoming events".to_string(),
                "Fee structure".to_string(),
            ],
        }
    }
}

/// External speech-to-text command. Voice capture is unsupported when `command` is unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            language: "en-IN".to_string(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides (after `.env` has been loaded).
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV)
            && !url.trim().is_empty()
        {
            self.backend.url = url.trim().to_string();
        }
    }

    /// Root directory for all chatbox state.
    pub fn base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatbox")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::base_dir().join("config.toml")
    }

    /// Path to the persisted key/value file for a profile.
    pub fn storage_path(profile: &str) -> PathBuf {
        Self::base_dir()
            .join("profiles")
            .join(format!("{}.json", profile))
    }

    /// Path to the diagnostic log file.
    pub fn log_path() -> PathBuf {
        Self::base_dir().join("chatbox.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://127.0.0.1:4000/chat");
        assert_eq!(config.backend.timeout_seconds, 60);
        assert_eq!(config.storage.messages_key, "campus_ai_college_msgs_v1");
        assert_eq!(config.storage.session_key, "campus_ai_college_session_v1");
        assert_eq!(config.ui.layout, Layout::Full);
        assert!(config.voice.command.is_none());
        assert_eq!(config.voice.language, "en-IN");
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
[backend]
url = "https://example.edu/api/chat"
timeout_seconds = 15

[storage]
messages_key = "college_chat_messages"
session_key = "college_chat_session"

[ui]
layout = "collapsible"
suggestions = ["Library hours"]

[voice]
command = "listen-once"
args = ["--single"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.url, "https://example.edu/api/chat");
        assert_eq!(config.backend.timeout_seconds, 15);
        assert_eq!(config.storage.messages_key, "college_chat_messages");
        assert_eq!(config.storage.seen_key, "campus_ai_seen_v1");
        assert_eq!(config.ui.layout, Layout::Collapsible);
        assert_eq!(config.ui.suggestions, vec!["Library hours".to_string()]);
        assert_eq!(config.voice.command.as_deref(), Some("listen-once"));
        assert_eq!(config.voice.args, vec!["--single".to_string()]);
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml_str = r#"
[chat]
greeting = "Hi!"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.greeting, "Hi!");
        assert_eq!(config.chat.placeholder_reply, "⚠️ No reply from server.");
        assert_eq!(config.backend.timeout_seconds, 60);
    }

    #[test]
    fn load_from_missing_path_returns_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config.ui.title, "Campus AI");
    }

    #[test]
    fn load_from_invalid_toml_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[backend\nurl = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn storage_path_is_per_profile() {
        let a = Config::storage_path("default");
        let b = Config::storage_path("kiosk");
        assert_ne!(a, b);
        assert!(a.ends_with("profiles/default.json"));
    }
}
