use super::*;
use anyhow::anyhow;
use std::process::{ExitCode, Termination};

#[test]
fn test_config_error_display() {
    let err = CliError::ConfigError("bad config".to_string());
    assert_eq!(format!("{}", err), "Configuration error: bad config");
}

#[test]
fn test_auth_error_display() {
    let err = CliError::AuthError("bad auth".to_string());
    assert_eq!(format!("{}", err), "Authentication error: bad auth");
}

#[test]
fn test_network_error_display() {
    let err = CliError::NetworkError("net fail".to_string());
    assert_eq!(format!("{}", err), "Network error: net fail");
}

#[test]
fn test_invalid_arguments_display() {
    let err = CliError::InvalidArguments("bad arg".to_string());
    assert_eq!(format!("{}", err), "Invalid arguments: bad arg");
}

#[test]
fn test_other_error_display() {
    let err = CliError::Other("other".to_string());
    assert_eq!(format!("{}", err), "Error: other");
}

#[test]
fn test_from_anyhow_error() {
    let err: CliError = anyhow!("anyhow error").into();
    assert!(matches!(err, CliError::Other(_)));
}

#[test]
fn test_from_platform_error() {
    let auth: CliError = PlatformError::AuthError("status 401".to_string()).into();
    assert!(matches!(auth, CliError::AuthError(_)));

    let project: CliError = PlatformError::InvalidProjectRef("owner".to_string()).into();
    assert!(matches!(project, CliError::InvalidArguments(_)));

    let network: Vec<CliError> = vec![
        PlatformError::ApiError("status 500".to_string()).into(),
        PlatformError::DeliveryFailed(400, "no_text".to_string()).into(),
        PlatformError::InvalidResponse.into(),
        PlatformError::NotFound("/projects/1".to_string()).into(),
        PlatformError::RateLimitExceeded.into(),
        PlatformError::Transport("connection refused".to_string()).into(),
    ];
    for err in network {
        assert!(matches!(err, CliError::NetworkError(_)), "{:?}", err);
    }
}

#[test]
fn test_from_review_bot_error() {
    let config: CliError = ReviewBotError::ConfigError("reviewers".to_string()).into();
    assert!(matches!(config, CliError::ConfigError(_)));

    let template: CliError = ReviewBotError::TemplateError("{nope}".to_string()).into();
    assert!(matches!(template, CliError::ConfigError(_)));

    let provider: CliError =
        ReviewBotError::GitProviderError(PlatformError::AuthError("401".to_string())).into();
    assert!(matches!(provider, CliError::AuthError(_)));
}

fn exit_code(err: CliError) -> String {
    format!("{:?}", err.report())
}

#[test]
fn test_exit_codes() {
    let code = |c: u8| format!("{:?}", ExitCode::from(c));

    assert_eq!(exit_code(CliError::ConfigError(String::new())), code(2));
    assert_eq!(exit_code(CliError::AuthError(String::new())), code(3));
    assert_eq!(exit_code(CliError::NetworkError(String::new())), code(4));
    assert_eq!(exit_code(CliError::InvalidArguments(String::new())), code(5));
    assert_eq!(
        exit_code(CliError::Other(String::new())),
        format!("{:?}", ExitCode::FAILURE)
    );
}
