//! Transient user notifications
//!
//! Recovered failures and workflow results are reported through a
//! [`Notifier`]; the binary logs them, tests collect them.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use shared::Language;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
            code: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            code: None,
        }
    }

    /// User-facing report of a failure; no internals are exposed
    pub fn from_error(error: &ClientError, lang: Language) -> Self {
        Self {
            severity: Severity::Error,
            message: error.message(lang),
            code: Some(error.code().to_string()),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Success | Severity::Info => tracing::info!(code = ?n.code, "{}", n.message),
            Severity::Warning => tracing::warn!(code = ?n.code, "{}", n.message),
            Severity::Error => tracing::error!(code = ?n.code, "{}", n.message),
        }
    }
}

/// Collects notifications in memory
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
