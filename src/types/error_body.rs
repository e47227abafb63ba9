use serde::Deserialize;

/// Error details returned by the API on a non-success status.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Numeric HTTP-like code.
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Canonical status name, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Envelope of an API error response.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// The error, when the body follows the documented shape.
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

impl ErrorBody {
    /// Parse an error body, returning the remote message if there is one.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .and_then(|detail| detail.message)
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_documented_shape() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            ErrorBody::message_from(body),
            Some("API key not valid.".to_string())
        );
    }

    #[test]
    fn message_from_garbage() {
        assert_eq!(ErrorBody::message_from("<html>bad gateway</html>"), None);
        assert_eq!(ErrorBody::message_from(r#"{"error": {}}"#), None);
    }
}
