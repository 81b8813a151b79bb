use review_bot_core::errors::ReviewBotError;
use review_bot_developer_platforms::errors::Error as PlatformError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err.to_string())
    }
}

impl From<PlatformError> for CliError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::AuthError(_) => CliError::AuthError(err.to_string()),
            PlatformError::InvalidProjectRef(_) => CliError::InvalidArguments(err.to_string()),
            PlatformError::ApiError(_)
            | PlatformError::DeliveryFailed(_, _)
            | PlatformError::InvalidResponse
            | PlatformError::NotFound(_)
            | PlatformError::RateLimitExceeded
            | PlatformError::Transport(_) => CliError::NetworkError(err.to_string()),
        }
    }
}

impl From<ReviewBotError> for CliError {
    fn from(err: ReviewBotError) -> Self {
        match err {
            ReviewBotError::GitProviderError(e) => e.into(),
            ReviewBotError::ConfigError(_) | ReviewBotError::TemplateError(_) => {
                CliError::ConfigError(err.to_string())
            }
        }
    }
}

impl std::process::Termination for CliError {
    fn report(self) -> std::process::ExitCode {
        match self {
            CliError::ConfigError(_) => std::process::ExitCode::from(2),
            CliError::AuthError(_) => std::process::ExitCode::from(3),
            CliError::NetworkError(_) => std::process::ExitCode::from(4),
            CliError::InvalidArguments(_) => std::process::ExitCode::from(5),
            CliError::Other(_) => std::process::ExitCode::FAILURE,
        }
    }
}
