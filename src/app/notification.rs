// ABOUTME: Transient status messages shown under the tab bar, e.g. blocked navigation
// Each message expires on its own after a few seconds

use ratatui::style::Color;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: String, kind: NotificationKind) -> Self {
        Self {
            message,
            kind,
            created_at: Instant::now(),
            duration: Duration::from_secs(4),
        }
    }

    pub fn info(message: String) -> Self {
        Self::new(message, NotificationKind::Info)
    }

    pub fn warning(message: String) -> Self {
        Self::new(message, NotificationKind::Warning)
    }

    pub fn error(message: String) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}
