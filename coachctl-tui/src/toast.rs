//! Transient notifications shown in the footer

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A message that disappears on its own after a while, or on the next key press
#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    kind: ToastKind,
    expires_at: Instant,
}

impl Toast {
    pub fn info(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(message, ToastKind::Info, ttl)
    }

    pub fn error(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(message, ToastKind::Error, ttl)
    }

    fn new(message: impl Into<String>, kind: ToastKind, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let toast = Toast::error("Error: offline", Duration::from_secs(4));
        let now = Instant::now();

        assert!(!toast.is_expired(now));
        assert!(toast.is_expired(now + Duration::from_secs(5)));
        assert_eq!(toast.kind(), ToastKind::Error);
        assert_eq!(toast.message(), "Error: offline");
    }
}
