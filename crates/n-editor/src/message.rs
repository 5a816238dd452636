//! Status message shown in the message bar.
//!
//! A message is visible for a fixed time after it is set, then disappears
//! from the screen. The text itself is kept until it is replaced.

use std::time::{Duration, Instant};

/// How long a message stays on screen unless configured otherwise.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// A message and the moment it was set.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    /// No message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            set_at: None,
        }
    }

    /// Replace the message, stamping it with `now`.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.set_at = Some(now);
    }

    /// The stored text, visible or not.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text to draw at `now`, or `None` once `timeout` has elapsed.
    #[must_use]
    pub fn visible_text(&self, now: Instant, timeout: Duration) -> Option<&str> {
        let set_at = self.set_at?;
        if self.text.is_empty() || now.saturating_duration_since(set_at) >= timeout {
            return None;
        }
        Some(&self.text)
    }

    /// Whether the message would be drawn at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant, timeout: Duration) -> bool {
        self.visible_text(now, timeout).is_some()
    }
}
