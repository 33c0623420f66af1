// ABOUTME: Voice capture adapter — turns one spoken utterance into text via an external command.
// ABOUTME: Unsupported (and hidden in the TUI) when no speech-to-text command is configured.

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::VoiceConfig;

/// Environment variable carrying the recognition language to the capture command.
pub const VOICE_LANG_ENV: &str = "CHATBOX_VOICE_LANG";

/// A speech-recognition capability.
#[async_trait]
pub trait VoiceCapture: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Listen for a single utterance. `Ok(None)` means nothing was recognized.
    async fn listen(&self) -> anyhow::Result<Option<String>>;
}

/// Runs a configured command and takes the first non-empty stdout line as the transcript.
pub struct CommandVoiceCapture {
    command: Option<String>,
    args: Vec<String>,
    language: String,
}

impl CommandVoiceCapture {
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self {
            command: config
                .command
                .clone()
                .filter(|c| !c.trim().is_empty()),
            args: config.args.clone(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl VoiceCapture for CommandVoiceCapture {
    fn is_supported(&self) -> bool {
        self.command.is_some()
    }

    async fn listen(&self) -> anyhow::Result<Option<String>> {
        let Some(command) = self.command.as_deref() else {
            anyhow::bail!("voice capture is not configured");
        };

        let output = Command::new(command)
            .args(&self.args)
            .env(VOICE_LANG_ENV, &self.language)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            anyhow::bail!(
                "voice command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(first_transcript(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn first_transcript(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
