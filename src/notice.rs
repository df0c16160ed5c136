//! Transient feedback notices.
//!
//! A notice is shown for a fixed lifetime and then dropped. Expiry is driven
//! by the caller passing the current [`Instant`], so the queue never spawns
//! timers of its own and stays deterministic under test.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Default notice lifetime
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            description: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Identifies a scheduled notice for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledNotice {
    handle: NoticeHandle,
    notice: Notice,
    expires_at: Instant,
}

/// FIFO of live notices
#[derive(Debug, Clone)]
pub struct NoticeQueue {
    ttl: Duration,
    next_handle: u64,
    entries: VecDeque<ScheduledNotice>,
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_NOTICE_TTL_MS))
    }
}

impl NoticeQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_handle: 0,
            entries: VecDeque::new(),
        }
    }

    /// Schedule `notice` to expire one lifetime after `now`
    pub fn push(&mut self, notice: Notice, now: Instant) -> NoticeHandle {
        let handle = NoticeHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push_back(ScheduledNotice {
            handle,
            notice,
            expires_at: now + self.ttl,
        });
        handle
    }

    /// Remove a notice before it expires; false if it is already gone
    pub fn cancel(&mut self, handle: NoticeHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Drop every notice whose lifetime has elapsed, oldest first
    pub fn expire(&mut self, now: Instant) -> Vec<Notice> {
        let mut expired = Vec::new();
        while let Some(front) = self.entries.front() {
            if front.expires_at > now {
                break;
            }
            if let Some(entry) = self.entries.pop_front() {
                expired.push(entry.notice);
            }
        }
        expired
    }

    /// Most recent live notice
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back().map(|entry| &entry.notice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_in_fifo_order() {
        let start = Instant::now();
        let mut queue = NoticeQueue::new(Duration::from_millis(100));
        queue.push(Notice::success("first"), start);
        queue.push(Notice::info("second"), start + Duration::from_millis(50));

        assert!(queue.expire(start + Duration::from_millis(99)).is_empty());

        let expired = queue.expire(start + Duration::from_millis(100));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].message, "first");
        assert_eq!(queue.latest().map(|n| n.message.as_str()), Some("second"));

        let expired = queue.expire(start + Duration::from_millis(500));
        assert_eq!(expired[0].message, "second");
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_removes_only_that_notice() {
        let now = Instant::now();
        let mut queue = NoticeQueue::default();
        let first = queue.push(Notice::warning("a"), now);
        queue.push(Notice::error("b"), now);

        assert!(queue.cancel(first));
        assert!(!queue.cancel(first));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.latest().map(|n| n.message.as_str()), Some("b"));
    }

    #[test]
    fn default_lifetime_is_three_seconds() {
        let now = Instant::now();
        let mut queue = NoticeQueue::default();
        queue.push(Notice::info("saved"), now);
        assert!(queue.expire(now + Duration::from_millis(2999)).is_empty());
        assert_eq!(queue.expire(now + Duration::from_secs(3)).len(), 1);
    }
}
