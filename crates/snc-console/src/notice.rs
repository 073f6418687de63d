use std::time::{Duration, Instant};

pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    raised_at: Instant,
}

/// Single-slot transient operator message. A newer notice always replaces
/// the pending one and restarts the countdown; overlapping notices are
/// lossy by design.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn raise(&mut self, message: impl Into<String>, kind: NoticeKind, now: Instant) {
        self.current = Some(Notice {
            message: message.into(),
            kind,
            raised_at: now,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        if let Some(notice) = &self.current {
            if now.duration_since(notice.raised_at) >= NOTICE_TTL {
                self.current = None;
            }
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
