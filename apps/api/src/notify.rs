//! User-visible notifications.
//!
//! Flows report outcomes ("pitch saved", "save failed") through a `Notifier`
//! instead of touching presentation state. Handlers hand a `CollectingNotifier`
//! to the flow and return what it gathered alongside the response body.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Logs every notice and keeps it for the response.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the gathered notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut notices) => std::mem::take(&mut *notices),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => warn!("notice: {message}"),
            NoticeKind::Success | NoticeKind::Info => info!("notice: {message}"),
        }

        let notice = Notice {
            kind,
            message: message.to_string(),
        };
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order_and_drains() {
        let notifier = CollectingNotifier::new();
        notifier.notify("Pitch generated", NoticeKind::Info);
        notifier.notify("Pitch saved", NoticeKind::Success);

        let notices = notifier.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "Pitch generated");
        assert_eq!(notices[1].kind, NoticeKind::Success);
        assert!(notifier.drain().is_empty());
    }

    #[test]
    fn test_notice_kind_serializes_snake_case() {
        let json = serde_json::to_string(&NoticeKind::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
