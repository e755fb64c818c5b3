/*!
 * Tests for error types and conversions
 */

use yasrai::errors::{AppError, ProviderError, ReconcileError, SubtitleError};

#[test]
fn test_providerError_fromStatus_shouldClassifyStatusCodes() {
    assert!(matches!(ProviderError::from_status(401, "no".into()), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "no".into()), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow".into()), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(500, "boom".into()),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_providerError_isRetryable_shouldOnlyRetryTransientFailures() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("429".into()).is_retryable());
    assert!(ProviderError::from_status(503, "busy".into()).is_retryable());
    assert!(!ProviderError::from_status(400, "bad".into()).is_retryable());
    assert!(!ProviderError::ParseError("x".into()).is_retryable());
}

#[test]
fn test_reconcileError_isTransportFailure_shouldSeparateProviderFromContract() {
    let transport: ReconcileError = ProviderError::ConnectionError("down".into()).into();
    assert!(transport.is_transport_failure());

    let malformed = ReconcileError::MalformedPayload("pair of 3".into());
    assert!(!malformed.is_transport_failure());

    let not_json: ReconcileError = ProviderError::InvalidCompletion("expected value".into()).into();
    assert!(matches!(not_json, ReconcileError::MalformedPayload(_)));
    assert!(!not_json.is_transport_failure());

    let out_of_window = ReconcileError::IndexOutOfWindow { side: "source", index: 9, window_len: 4 };
    assert!(!out_of_window.is_transport_failure());
    assert_eq!(
        out_of_window.to_string(),
        "Oracle referenced source index 9, window holds 1..=4"
    );
}

#[test]
fn test_appError_conversions_shouldWrapSourceErrors() {
    let from_subtitle: AppError = SubtitleError::Parse("empty".into()).into();
    assert!(matches!(from_subtitle, AppError::Subtitle(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}
