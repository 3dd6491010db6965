//! # Notices
//!
//! Messages the UI shows as toasts: "saved locally", "sync failed",
//! "storage error". Handlers push; the UI drains.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Oldest notices are dropped past this many.
const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            level,
            message: message.into(),
            at: Utc::now(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    /// Takes every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_order() {
        let mut notices = Notices::new();
        notices.info("a");
        notices.warning("b");

        let drained = notices.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "a");
        assert_eq!(drained[1].level, NoticeLevel::Warning);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_bounded() {
        let mut notices = Notices::new();
        for i in 0..(MAX_NOTICES + 5) {
            notices.error(format!("n{}", i));
        }
        assert_eq!(notices.len(), MAX_NOTICES);
        assert_eq!(notices.iter().next().unwrap().message, "n5");
    }
}
