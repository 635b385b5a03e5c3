//! Response assertions.
//!
//! # Design
//! Each check is a free function of a `Response` (and an expectation) that
//! returns `Ok(())` or an `AssertionError` naming the expected and actual
//! values. Nothing is retried and no state is kept between checks, so a
//! test can chain them with `?` and stop at the first violation.

use serde_json::Value;
use tracing::debug;

use crate::error::AssertionError;
use crate::http::Response;

pub type AssertionResult = Result<(), AssertionError>;

pub fn assert_status_code(response: &Response, expected: u16) -> AssertionResult {
    debug!(expected, "asserting status code");
    let actual = response.status();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::StatusCode { expected, actual })
    }
}

/// Passes for any status in `200..=299`.
pub fn assert_response_success(response: &Response) -> AssertionResult {
    let actual = response.status();
    debug!(status = actual, "asserting successful response");
    if response.is_success() {
        Ok(())
    } else {
        Err(AssertionError::NotSuccess { actual })
    }
}

/// The path must resolve to a non-null value in the JSON body.
pub fn assert_response_contains_key(response: &Response, path: &str) -> AssertionResult {
    debug!(path, "asserting response contains key");
    match response.path(path) {
        Some(_) => Ok(()),
        None => Err(AssertionError::MissingKey {
            path: path.to_string(),
        }),
    }
}

/// The value at `path` must equal `expected`.
///
/// Numbers compare by numeric value, so `1` matches `1.0`. An expected
/// `null` passes when the path is absent or null; any other expectation
/// against an absent path fails with `JsonPathAbsent`.
pub fn assert_json_path(
    response: &Response,
    path: &str,
    expected: impl Into<Value>,
) -> AssertionResult {
    let expected = expected.into();
    debug!(path, %expected, "asserting JSON path");
    match response.path(path) {
        None if expected.is_null() => Ok(()),
        None => Err(AssertionError::JsonPathAbsent {
            path: path.to_string(),
            expected,
        }),
        Some(actual) if values_equal(actual, &expected) => Ok(()),
        Some(actual) => Err(AssertionError::JsonPathMismatch {
            path: path.to_string(),
            expected,
            actual: actual.clone(),
        }),
    }
}

pub fn assert_header_exists(response: &Response, name: &str) -> AssertionResult {
    debug!(name, "asserting header exists");
    match response.header(name) {
        Some(_) => Ok(()),
        None => Err(AssertionError::MissingHeader {
            name: name.to_string(),
        }),
    }
}

/// Header name matching ignores case; the value must match exactly.
pub fn assert_header_value(response: &Response, name: &str, expected: &str) -> AssertionResult {
    debug!(name, expected, "asserting header value");
    let actual = response.header(name);
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(AssertionError::HeaderMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: actual.map(str::to_string),
        })
    }
}

pub fn assert_response_body_contains(response: &Response, text: &str) -> AssertionResult {
    debug!(text, "asserting response body contains");
    if response.body().contains(text) {
        Ok(())
    } else {
        Err(AssertionError::BodyMissingText {
            expected: text.to_string(),
        })
    }
}

/// Elapsed time must be strictly below `max_ms`.
pub fn assert_response_time(response: &Response, max_ms: u64) -> AssertionResult {
    let actual_ms = u64::try_from(response.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(actual_ms, max_ms, "asserting response time");
    if actual_ms < max_ms {
        Ok(())
    } else {
        Err(AssertionError::TooSlow { max_ms, actual_ms })
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            },
        },
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn pet_response() -> Response {
        Response::new(
            200,
            r#"{"id":123,"name":"Bella","status":"available","category":{"name":"Dogs"},"weight":4.0}"#,
        )
        .with_header("Content-Type", "application/json")
    }

    #[test]
    fn status_code_passes_on_exact_match() {
        assert!(assert_status_code(&Response::new(200, ""), 200).is_ok());
    }

    #[test]
    fn status_code_failure_names_expected_and_actual() {
        let err = assert_status_code(&Response::new(404, ""), 200).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("200"), "{message}");
        assert!(message.contains("404"), "{message}");
    }

    #[test]
    fn success_range_boundaries() {
        for status in [200, 204, 299] {
            assert!(assert_response_success(&Response::new(status, "")).is_ok(), "{status}");
        }
        for status in [199, 300, 404, 500] {
            let err = assert_response_success(&Response::new(status, "")).unwrap_err();
            assert_eq!(err, AssertionError::NotSuccess { actual: status });
        }
    }

    #[test]
    fn contains_key_resolves_nested_paths() {
        let response = pet_response();
        assert!(assert_response_contains_key(&response, "id").is_ok());
        assert!(assert_response_contains_key(&response, "category.name").is_ok());
        assert_eq!(
            assert_response_contains_key(&response, "tags"),
            Err(AssertionError::MissingKey {
                path: "tags".to_string()
            })
        );
    }

    #[test]
    fn contains_key_fails_for_non_json_body() {
        let response = Response::new(200, "ok");
        assert!(assert_response_contains_key(&response, "id").is_err());
    }

    #[test]
    fn json_path_is_case_sensitive() {
        let response = pet_response();
        assert!(assert_json_path(&response, "name", "Bella").is_ok());
        let err = assert_json_path(&response, "name", "bella").unwrap_err();
        assert!(matches!(err, AssertionError::JsonPathMismatch { .. }));
    }

    #[test]
    fn json_path_compares_numbers_by_value() {
        let response = pet_response();
        assert!(assert_json_path(&response, "id", 123).is_ok());
        assert!(assert_json_path(&response, "id", 123u64).is_ok());
        assert!(assert_json_path(&response, "weight", 4).is_ok());
        assert!(assert_json_path(&response, "id", 124).is_err());
    }

    #[test]
    fn json_path_absent_is_a_distinct_failure() {
        let err = assert_json_path(&pet_response(), "owner", "Ann").unwrap_err();
        assert_eq!(
            err,
            AssertionError::JsonPathAbsent {
                path: "owner".to_string(),
                expected: json!("Ann"),
            }
        );
    }

    #[test]
    fn json_path_null_expectation_accepts_absent() {
        assert!(assert_json_path(&pet_response(), "owner", Value::Null).is_ok());
    }

    #[test]
    fn header_exists_ignores_case() {
        let response = pet_response();
        assert!(assert_header_exists(&response, "content-type").is_ok());
        assert!(assert_header_exists(&response, "x-rate-limit").is_err());
    }

    #[test]
    fn header_value_must_match_exactly() {
        let response = pet_response();
        assert!(assert_header_value(&response, "CONTENT-TYPE", "application/json").is_ok());
        let err = assert_header_value(&response, "content-type", "Application/JSON").unwrap_err();
        assert_eq!(
            err.to_string(),
            "header 'content-type': expected Application/JSON but got application/json"
        );
    }

    #[test]
    fn header_value_on_missing_header_fails_cleanly() {
        let err = assert_header_value(&pet_response(), "X-Expires-After", "soon").unwrap_err();
        assert!(matches!(err, AssertionError::HeaderMismatch { actual: None, .. }));
    }

    #[test]
    fn body_contains_uses_raw_text() {
        let response = pet_response();
        assert!(assert_response_body_contains(&response, "\"status\":\"available\"").is_ok());
        assert!(assert_response_body_contains(&response, "sold").is_err());
    }

    #[test]
    fn response_time_is_strictly_less_than_limit() {
        let at = |ms| Response::new(200, "").with_elapsed(Duration::from_millis(ms));
        assert!(assert_response_time(&at(4999), 5000).is_ok());
        assert_eq!(
            assert_response_time(&at(5000), 5000),
            Err(AssertionError::TooSlow {
                max_ms: 5000,
                actual_ms: 5000
            })
        );
    }
}
