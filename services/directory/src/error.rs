use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Directory domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("ticket not found")]
    TicketNotFound,
    #[error("training record not found")]
    TrainingRecordNotFound,
    #[error("document not found")]
    DocumentNotFound,
    #[error("message not found")]
    MessageNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("employee already exists")]
    EmployeeAlreadyExists,
    #[error("employee email already in use")]
    EmployeeEmailTaken,
    #[error("document already exists")]
    DocumentAlreadyExists,
    #[error("account not approved")]
    NotApproved,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("unsupported file type")]
    UnsupportedFileType,
    /// Referential constraint rejected by the repository. Holds the database detail.
    #[error("constraint violation")]
    Constraint(String),
    #[error("storage error")]
    Storage(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

/// Coarse failure class a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authorization,
    NotFound,
    Conflict,
    NotApproved,
    InvalidCredential,
    Validation,
    Constraint,
    Storage,
    Internal,
}

impl DirectoryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::TrainingRecordNotFound => "TRAINING_RECORD_NOT_FOUND",
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Self::MessageNotFound => "MESSAGE_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::EmployeeAlreadyExists => "EMPLOYEE_ALREADY_EXISTS",
            Self::EmployeeEmailTaken => "EMPLOYEE_EMAIL_TAKEN",
            Self::DocumentAlreadyExists => "DOCUMENT_ALREADY_EXISTS",
            Self::NotApproved => "NOT_APPROVED",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            Self::Constraint(_) => "CONSTRAINT",
            Self::Storage(_) => "STORAGE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Forbidden => ErrorCategory::Authorization,
            Self::UserNotFound
            | Self::EmployeeNotFound
            | Self::TicketNotFound
            | Self::TrainingRecordNotFound
            | Self::DocumentNotFound
            | Self::MessageNotFound => ErrorCategory::NotFound,
            Self::UserAlreadyExists
            | Self::EmployeeAlreadyExists
            | Self::EmployeeEmailTaken
            | Self::DocumentAlreadyExists => ErrorCategory::Conflict,
            Self::NotApproved => ErrorCategory::NotApproved,
            Self::InvalidCredential => ErrorCategory::InvalidCredential,
            Self::UnsupportedFileType => ErrorCategory::Validation,
            Self::Constraint(_) => ErrorCategory::Constraint,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match self.category() {
            ErrorCategory::Authorization | ErrorCategory::NotApproved => StatusCode::FORBIDDEN,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::InvalidCredential => StatusCode::UNAUTHORIZED,
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Constraint => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::Storage => StatusCode::BAD_GATEWAY,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::Storage(e) => tracing::error!(error = %e, kind = "STORAGE", "storage error"),
            Self::Constraint(detail) => tracing::warn!(detail = %detail, "constraint violation"),
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
