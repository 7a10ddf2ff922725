//! User-visible notifications.
//!
//! Remote failures never propagate past the view that issued them; they end
//! up here as notices, which the front end renders (the CLI prints them to
//! stderr after each command).

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

/// Oldest notices are dropped beyond this many.
const MAX_NOTICES: usize = 32;

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub timestamp: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Instant::now(),
        }
    }
}

/// Shared notice queue. Clones refer to the same queue.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        let mut queue = self.queue.lock();
        if queue.len() == MAX_NOTICES {
            queue.pop_front();
        }
        queue.push_back(notice);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Notice::new(message, NoticeLevel::Info));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Notice::new(message, NoticeLevel::Success));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Notice::new(message, NoticeLevel::Warning));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notice::new(message, NoticeLevel::Error));
    }

    pub fn latest(&self) -> Option<Notice> {
        self.queue.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.queue.lock().drain(..).collect()
    }
}
