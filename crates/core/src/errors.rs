use review_bot_developer_platforms::errors::Error;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum ReviewBotError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Git provider error: {0}")]
    GitProviderError(#[from] Error),

    #[error("Template error: {0}")]
    TemplateError(String),
}
