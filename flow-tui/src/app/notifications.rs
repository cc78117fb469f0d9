use std::time::{Duration, Instant};

/// How long a notice stays on screen unless dismissed.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    created: Instant,
}

/// Toast-style messages shown under the tab bar.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Vec<Notice>,
}

impl Notifications {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        self.items.push(Notice {
            level,
            message: message.into(),
            created: now,
        });
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
    }

    /// Drop notices older than [`NOTICE_TTL`].
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|n| now.saturating_duration_since(n.created) < NOTICE_TTL);
    }

    /// Dismiss the newest notice.
    pub fn dismiss(&mut self) -> bool {
        self.items.pop().is_some()
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_ttl() {
        let start = Instant::now();
        let mut notes = Notifications::default();
        notes.push(NoticeLevel::Error, "Failed to load projects", start);
        notes.push(NoticeLevel::Info, "later", start + Duration::from_secs(3));

        notes.prune(start + Duration::from_secs(5));

        assert_eq!(notes.items().len(), 1);
        assert_eq!(notes.latest().unwrap().message, "later");
    }

    #[test]
    fn dismiss_removes_newest_and_overflow_drops_oldest() {
        let now = Instant::now();
        let mut notes = Notifications::default();
        for i in 0..5 {
            notes.push(NoticeLevel::Success, format!("n{i}"), now);
        }
        assert_eq!(notes.items().len(), MAX_VISIBLE);
        assert_eq!(notes.items()[0].message, "n2");

        assert!(notes.dismiss());
        assert_eq!(notes.latest().unwrap().message, "n3");
    }
}
