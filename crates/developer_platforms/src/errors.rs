#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for hosting platform and chat webhook operations.
///
/// Every variant is fatal for a reminder run. The aggregation engine never
/// retries and never produces a partial reminder set, so callers only need
/// these values for reporting and for picking an exit code.
///
/// # Examples
///
/// ```rust
/// use review_bot_developer_platforms::errors::Error;
///
/// let auth_error = Error::AuthError("Invalid token".to_string());
/// assert_eq!(auth_error.to_string(), "Authentication failed: Invalid token");
///
/// let rate_limit = Error::RateLimitExceeded;
/// assert_eq!(rate_limit.to_string(), "Rate limit exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic API request failure.
    ///
    /// The platform answered with a non-success status that has no more
    /// specific variant. The string carries the status and the endpoint.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication failed with the platform.
    ///
    /// Raised for 401 and 403 responses, and when a token cannot be used to
    /// build an HTTP client at all.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// The chat webhook rejected the message.
    ///
    /// Parameters: HTTP status code, response body
    #[error("Failed to deliver message, status {0}: {1}")]
    DeliveryFailed(u16, String),

    /// The project reference cannot be used with the selected platform.
    ///
    /// For example a numeric GitLab project ID handed to the GitHub provider.
    #[error("Invalid project reference: {0}")]
    InvalidProjectRef(String),

    /// Invalid response format from platform API.
    ///
    /// The body could not be decoded into the expected shape.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The project, repository or request does not exist, or the token
    /// cannot see it.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Platform rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The HTTP request never produced a response.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl Error {
    /// Maps a non-success HTTP status to the matching error variant.
    pub fn from_status(status: u16, endpoint: &str) -> Self {
        match status {
            401 | 403 => Error::AuthError(format!("status {} for {}", status, endpoint)),
            404 => Error::NotFound(endpoint.to_string()),
            429 => Error::RateLimitExceeded,
            _ => Error::ApiError(format!("status {} for {}", status, endpoint)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::InvalidResponse
        } else if let Some(status) = e.status() {
            let endpoint = e.url().map(|u| u.path().to_string()).unwrap_or_default();
            Error::from_status(status.as_u16(), &endpoint)
        } else {
            Error::Transport(e.to_string())
        }
    }
}
