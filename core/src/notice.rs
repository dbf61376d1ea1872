//! Player-facing notices (toasts).
//!
//! Persistence failures and action outcomes are reported as notices, never
//! as panics or errors that reach the simulation.

use crate::command::ActionResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeIntent {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub intent:      NoticeIntent,
    pub title:       String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeIntent::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeIntent::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeIntent::Error, title, description)
    }

    /// "Exploration complete" / "Exploration blocked", carrying the
    /// action's own message.
    pub fn for_action(action_title: &str, result: &ActionResult) -> Self {
        if result.ok {
            Self::success(format!("{action_title} complete"), result.message.clone())
        } else {
            Self::error(format!("{action_title} blocked"), result.message.clone())
        }
    }

    pub fn is_error(&self) -> bool {
        self.intent == NoticeIntent::Error
    }

    fn new(intent: NoticeIntent, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { intent, title: title.into(), description: description.into() }
    }
}
