//! Error types for the reservation payments service.

/// Domain-level errors (business logic violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown status code: {code} (group {group})")]
    UnknownStatusCode { code: String, group: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes: BadRequest/NotFound are
/// user-actionable 4xx, Internal is everything else.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The conventional "entity missing" message used across the API.
    pub fn entity_not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity}을(를) 찾을 수 없습니다."))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(DomainError::ValidationError(msg)) => AppError::BadRequest(msg),
            RepoError::Domain(e) => AppError::Internal(e.to_string()),
            RepoError::NotFound => AppError::NotFound("요청한 데이터를 찾을 수 없습니다.".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::BadRequest(e),
        }
    }
}

impl From<crate::ports::GatewayError> for AppError {
    fn from(err: crate::ports::GatewayError) -> Self {
        match err {
            crate::ports::GatewayError::Unavailable(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_surfaces_as_bad_request() {
        let err: AppError = RepoError::Conflict("이미 예약되었습니다.".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_repo_not_found_surfaces_as_not_found() {
        let err: AppError = RepoError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: AppError = RepoError::Database("disk on fire".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
