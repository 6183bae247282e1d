//! API Models
//!
//! Request and response payloads for the chat endpoint, annotated with
//! `utoipa` schemas for the generated OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /get`.
#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's free-text query.
    #[schema(example = "How do I make a table in HTML?")]
    pub msg: String,
}

/// Successful reply from the chat endpoint.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_deserialization() {
        let json = r#"{"msg": "What is flexbox?"}"#;
        let payload: ChatRequest = serde_json::from_str(json).unwrap();

        assert_eq!(payload.msg, "What is flexbox?");
    }

    #[test]
    fn test_chat_request_missing_field() {
        let json = r#"{}"#;
        let result: Result<ChatRequest, _> = serde_json::from_str(json);

        assert!(result.is_err()); // Should fail because msg is required
    }

    #[test]
    fn test_chat_response_serialization() {
        let response = ChatResponse {
            response: "Flexbox is a CSS layout model.".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"response":"Flexbox is a CSS layout model."}"#);

        let deserialized: ChatResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.response, response.response);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "An internal server error occurred.".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"An internal server error occurred."}"#);
    }
}
