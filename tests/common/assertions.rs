//! Assertion macros shared by the suites

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert an error response: expected status and a `{error, status}` JSON body
///
/// Evaluates to the error message.
#[macro_export]
macro_rules! assert_error_response {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        let expected: axum::http::StatusCode = $status;
        assert_eq!(response.status_code(), expected);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["status"], expected.as_u16(), "body: {}", body);
        body["error"]
            .as_str()
            .unwrap_or_else(|| panic!("Missing error message in {}", body))
            .to_string()
    }};
}
