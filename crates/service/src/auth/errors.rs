use thiserror::Error;

/// Business errors for auth workflows.
///
/// Display strings are client-safe; internal variants carry detail that is
/// only ever logged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("{0}")]
    MissingFields(String),
    #[error("Refresh token is required")]
    MissingRefreshToken,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("Unknown role: {0}")]
    InvalidRole(String),
    #[error("User with this email already exists")]
    UserExists,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Access token required")]
    Unauthorized,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid or expired session")]
    InvalidSession,
    #[error("User not found")]
    UserNotFound,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable code for the wire and for logging
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "MISSING_CREDENTIALS",
            AuthError::MissingFields(_) => "MISSING_FIELDS",
            AuthError::MissingRefreshToken => "MISSING_REFRESH_TOKEN",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidRole(_) => "INVALID_ROLE",
            AuthError::UserExists => "USER_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidSession => "INVALID_SESSION",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => "INTERNAL_ERROR",
        }
    }

    /// Failures of the machinery rather than of the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_))
    }
}
