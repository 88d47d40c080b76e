use super::LlmError;
use serde_json::Value;

/// Classify a non-success provider HTTP response.
///
/// OpenAI and Anthropic both return an error envelope:
/// `{ "error": { "message": "...", "type": "..." } }` (Anthropic wraps it in
/// `{ "type": "error", ... }`). The structured `type` wins; otherwise the
/// status code and message heuristics decide.
pub fn classify_http_error(provider: &str, status: u16, body_text: &str) -> LlmError {
    let Some((message, error_type, details)) = parse_envelope(body_text) else {
        let message = if body_text.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body_text.to_string()
        };
        return map_status(status, message, None);
    };

    match error_type.as_deref().unwrap_or("") {
        "authentication_error" | "permission_error" | "invalid_api_key" => {
            LlmError::AuthenticationError(message)
        }
        "rate_limit_error" | "insufficient_quota" | "overloaded_error" if status != 529 => {
            LlmError::RateLimitError(message)
        }
        "invalid_request_error" | "not_found_error" | "request_too_large" => LlmError::ApiError {
            code: if status < 400 { 400 } else { status },
            message,
            details: Some(details),
        },
        "" => map_heuristics(provider, status, message, details),
        _ => map_status(status, message, Some(details)),
    }
}

fn parse_envelope(body_text: &str) -> Option<(String, Option<String>, Value)> {
    let json: Value = serde_json::from_str(body_text).ok()?;
    let error_obj = json.get("error")?;
    let message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    let error_type = error_obj
        .get("type")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Some((message, error_type, json))
}

fn map_heuristics(provider: &str, status: u16, message: String, details: Value) -> LlmError {
    let lower = message.to_lowercase();

    if status == 401 || lower.contains("api key") || lower.contains("unauthorized") {
        return LlmError::AuthenticationError(message);
    }
    if status == 429 || lower.contains("rate limit") || lower.contains("quota") {
        return LlmError::RateLimitError(message);
    }
    tracing::debug!(provider, status, "unclassified provider error envelope");
    map_status(status, message, Some(details))
}

fn map_status(status: u16, message: String, details: Option<Value>) -> LlmError {
    match status {
        401 | 403 => LlmError::AuthenticationError(message),
        429 => LlmError::RateLimitError(message),
        _ => LlmError::ApiError {
            code: status,
            message,
            details,
        },
    }
}
