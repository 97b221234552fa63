//! Error handling for the Salon Inventory client
//!
//! Every failure carries a stable code and a message in Ukrainian and English

use serde::Serialize;
use shared::{FormErrors, InvalidTransition, Language};
use thiserror::Error;

use crate::workflow::WorkflowStep;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Session errors
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] FormErrors),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] InvalidTransition),

    // Backend errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // Workflow errors
    #[error("Supply confirmation failed at {failed:?}")]
    WorkflowFailed {
        failed: Vec<WorkflowStep>,
        compensated: Vec<WorkflowStep>,
        uncompensated: Vec<WorkflowStep>,
    },

    // Local errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Report export error: {0}")]
    Export(String),
}

/// Error payload handed to notifications and logs
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_uk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ClientError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::SessionExpired => "SESSION_EXPIRED",
            ClientError::Forbidden => "FORBIDDEN",
            ClientError::InvalidCredentials => "INVALID_CREDENTIALS",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::InvalidTransition(_) => "INVALID_STATE_TRANSITION",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Status { .. } => "BACKEND_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Timeout => "TIMEOUT",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::WorkflowFailed { .. } => "SUPPLY_CONFIRMATION_FAILED",
            ClientError::Configuration(_) => "CONFIGURATION_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Export(_) => "EXPORT_ERROR",
        }
    }

    pub fn message_en(&self) -> String {
        match self {
            ClientError::NotAuthenticated => "Please sign in".to_string(),
            ClientError::SessionExpired => "Your session has expired, please sign in again".to_string(),
            ClientError::Forbidden => "You do not have permission to perform this action".to_string(),
            ClientError::InvalidCredentials => "Invalid email or password".to_string(),
            ClientError::Validation(errors) => errors.summary(Language::English),
            ClientError::InvalidTransition(t) => {
                format!("A {} supply can no longer be changed", t.from)
            }
            ClientError::NotFound(resource) => format!("{} not found", resource),
            ClientError::Status { .. } => "The server could not process the request".to_string(),
            ClientError::Transport(_) => "Could not reach the server".to_string(),
            ClientError::Timeout => "The server did not respond in time".to_string(),
            ClientError::Decode(_) => "The server sent an unexpected response".to_string(),
            ClientError::WorkflowFailed { .. } => {
                "Supply confirmation failed, the supply needs attention".to_string()
            }
            ClientError::Configuration(msg) => format!("Configuration error: {}", msg),
            ClientError::Storage(_) => "Could not store the session".to_string(),
            ClientError::Export(_) => "Could not write the report".to_string(),
        }
    }

    pub fn message_uk(&self) -> String {
        match self {
            ClientError::NotAuthenticated => "Будь ласка, увійдіть".to_string(),
            ClientError::SessionExpired => "Сесія завершилась, увійдіть знову".to_string(),
            ClientError::Forbidden => "У вас немає прав на цю дію".to_string(),
            ClientError::InvalidCredentials => "Неправильний email або пароль".to_string(),
            ClientError::Validation(errors) => errors.summary(Language::Ukrainian),
            ClientError::InvalidTransition(t) => format!(
                "Поставку зі статусом «{}» вже не можна змінити",
                t.from.label(Language::Ukrainian)
            ),
            ClientError::NotFound(resource) => format!("{} не знайдено", resource),
            ClientError::Status { .. } => "Сервер не зміг обробити запит".to_string(),
            ClientError::Transport(_) => "Не вдалося з'єднатися з сервером".to_string(),
            ClientError::Timeout => "Сервер не відповів вчасно".to_string(),
            ClientError::Decode(_) => "Сервер надіслав неочікувану відповідь".to_string(),
            ClientError::WorkflowFailed { .. } => {
                "Не вдалося підтвердити поставку, вона потребує уваги".to_string()
            }
            ClientError::Configuration(msg) => format!("Помилка налаштувань: {}", msg),
            ClientError::Storage(_) => "Не вдалося зберегти сесію".to_string(),
            ClientError::Export(_) => "Не вдалося записати звіт".to_string(),
        }
    }

    pub fn message(&self, lang: Language) -> String {
        match lang {
            Language::Ukrainian => self.message_uk(),
            Language::English => self.message_en(),
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let field = match self {
            ClientError::Validation(errors) => errors.errors.first().map(|e| e.field.clone()),
            _ => None,
        };
        ErrorDetail {
            code: self.code().to_string(),
            message_en: self.message_en(),
            message_uk: self.message_uk(),
            field,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<csv::Error> for ClientError {
    fn from(e: csv::Error) -> Self {
        ClientError::Export(e.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{SupplyAction, SupplyStatus};

    #[test]
    fn codes_are_stable() {
        assert_eq!(ClientError::SessionExpired.code(), "SESSION_EXPIRED");
        assert_eq!(ClientError::Timeout.code(), "TIMEOUT");
    }

    #[test]
    fn transition_message_names_the_status() {
        let err = ClientError::from(InvalidTransition {
            from: SupplyStatus::Confirmed,
            action: SupplyAction::Reject,
        });
        assert!(err.message_uk().contains("Підтверджено"));
        assert!(err.message_en().contains("CONFIRMED"));
    }

    #[test]
    fn detail_carries_both_languages() {
        let detail = ClientError::Forbidden.detail();
        assert_eq!(detail.code, "FORBIDDEN");
        assert_ne!(detail.message_en, detail.message_uk);
        assert!(detail.field.is_none());
    }
}
