//! Forum chat configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Buffered messages per forum room before slow subscribers lag
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Messages returned per history fetch
    #[serde(default = "default_history_page_size")]
    pub history_page_size: usize,

    /// Consecutive resubscribe attempts before a connection gives up
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

impl ChatConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_capacity == 0 {
            return Err(ValidationError::ZeroChatLimit("channel_capacity"));
        }
        if self.history_page_size == 0 {
            return Err(ValidationError::ZeroChatLimit("history_page_size"));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            history_page_size: default_history_page_size(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

fn default_channel_capacity() -> usize {
    128
}

fn default_history_page_size() -> usize {
    100
}

fn default_max_reconnect_attempts() -> u32 {
    5
}
