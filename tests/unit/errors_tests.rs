/*!
 * Tests for error types and conversions
 */

use std::error::Error;

use transguard::errors::{AppError, ProviderError, TranslationError};
use transguard::translation::Stage;

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Service unavailable".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Service unavailable"));
}

#[test]
fn test_providerError_fromStatus_shouldMapForbiddenToAuth() {
    assert!(matches!(
        ProviderError::from_status(403, "forbidden"),
        ProviderError::AuthenticationError(_)
    ));
    assert!(!ProviderError::from_status(429, "slow").is_transient());
}

#[test]
fn test_translationError_model_shouldExposeSource() {
    let error = TranslationError::model(
        Stage::QualityCheck,
        ProviderError::RequestFailed("timeout".to_string()),
    );

    assert!(error.to_string().contains("quality_check"));
    let source = error.source().expect("model errors carry their provider error");
    assert!(source.to_string().contains("timeout"));
}

#[test]
fn test_translationError_missingField_shouldNameFieldAndStage() {
    let error = TranslationError::MissingField {
        stage: Stage::RetryGate,
        field: "qc_passed",
    };
    let display = error.to_string();
    assert!(display.contains("qc_passed"));
    assert!(display.contains("retry_gate"));
}

#[test]
fn test_appError_fromTranslationError_shouldWrap() {
    let app_error: AppError = TranslationError::Config("no endpoint".to_string()).into();

    assert!(matches!(app_error, AppError::Translation(_)));
    assert!(app_error.to_string().contains("no endpoint"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let app_error: AppError = io_error.into();

    assert!(matches!(app_error, AppError::File(_)));
}
