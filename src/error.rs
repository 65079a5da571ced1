//! Common error types for the avatar service

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Avatar not found: {0}")]
    AvatarNotFound(String),

    #[error("Share grant not found for avatar {0}")]
    ShareNotFound(String),

    #[error("Not the owner of avatar {0}")]
    Forbidden(String),

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Generation provider error: {0}")]
    Provider(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code exposed in GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UserNotFound(_) => "USER_NOT_FOUND",
            AppError::AvatarNotFound(_) => "AVATAR_NOT_FOUND",
            AppError::ShareNotFound(_) => "SHARE_NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::UnsupportedModel(_) => "UNSUPPORTED_MODEL",
            AppError::Provider(_)
            | AppError::HttpClient(_)
            | AppError::Storage(_)
            | AppError::Broker(_) => "UPSTREAM_FAILURE",
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Database(_)
            | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The lookup key that triggered the failure, if the variant carries one
    fn identifier(&self) -> Option<&str> {
        match self {
            AppError::UserNotFound(id)
            | AppError::AvatarNotFound(id)
            | AppError::ShareNotFound(id)
            | AppError::Forbidden(id)
            | AppError::UnsupportedModel(id) => Some(id),
            _ => None,
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let identifier = self.identifier().map(str::to_owned);
        let mut gql = async_graphql::Error::new(self.to_string());
        gql = gql.extend_with(|_, e| e.set("code", code));
        if let Some(id) = identifier {
            gql = gql.extend_with(|_, e| e.set("identifier", id));
        }
        gql
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
