//! Transient notices (toasts)

use mx_core::error::MxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error notice with the user-facing text of `err`
    pub fn from_error(context: &str, err: &MxError) -> Self {
        Self::error(format!("{}: {}", context, err.user_message()))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
