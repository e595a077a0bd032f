use std::time::Duration;

/// A short-lived HUD message. Each new action overwrites the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Duration,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, now: Duration, ttl: Duration) -> Self {
        Self { text: text.into(), expires_at: now + ttl }
    }

    /// Still worth showing at `now`.
    pub fn is_active(&self, now: Duration) -> bool {
        now < self.expires_at
    }
}
