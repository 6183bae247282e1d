//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the chat endpoint, the static UI page, and OpenAPI documentation.

use crate::{
    handlers,
    models::{ChatRequest, ChatResponse, ErrorResponse},
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::chat),
    components(schemas(ChatRequest, ChatResponse, ErrorResponse)),
    tags(
        (name = "Tutor API", description = "Syllabus-gated web development tutor")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/", get(handlers::index))
        .route("/get", post(handlers::chat))
        // Apply the state ONLY to this group of routes.
        .with_state(app_state);

    // Create the final router that merges the stateful routes
    // with the stateless routes (like Swagger UI).
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Provider};
    use crate::sessions::SessionRegistry;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::path::PathBuf;
    use tower::ServiceExt;
    use tracing::Level;
    use tutor_core::{
        embedding::{MockEmbeddingService, TopicEmbeddings},
        gate::{DEFAULT_SIMILARITY_THRESHOLD, RelevanceGate},
        llm_client::MockLLMClient,
        syllabus::Syllabus,
        tutor::{REDIRECT_REPLY, REFUSAL_REPLY, TutorService, render_system_prompt},
    };

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:3000".parse().unwrap(),
            provider: Provider::OpenAI,
            openai_api_key: Some("test-key".to_string()),
            gemini_api_key: None,
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            log_level: Level::INFO,
            syllabus_path: PathBuf::from("./syllabus.json"),
            prompts_path: PathBuf::from("./prompts"),
        }
    }

    /// Builds a router backed by mock services. Only "HTML" and the table
    /// question get real vectors; everything else falls back to the zero
    /// vector and scores 0.0 against every label.
    async fn test_router(llm_reply: &str) -> Router {
        let syllabus =
            Syllabus::from_json_str(r#"{"HTML": ["Tags", "Tables"], "CSS": ["Selectors"]}"#)
                .unwrap();
        let embedder = MockEmbeddingService::new(vec![0.0, 0.0])
            .with_vector("HTML", vec![1.0, 0.0])
            .with_vector("how do i make a table in html?", vec![0.9, 0.1]);
        let topics = Arc::new(TopicEmbeddings::build(&embedder, &syllabus).await.unwrap());
        let gate = RelevanceGate::new(Arc::new(embedder), topics, DEFAULT_SIMILARITY_THRESHOLD);
        let system_prompt = render_system_prompt("Tutor.\n{syllabus_topics}", &syllabus);
        let tutor = Arc::new(TutorService::new(
            gate,
            Arc::new(MockLLMClient::new(llm_reply)),
            system_prompt,
        ));

        let app_state = Arc::new(AppState {
            tutor,
            sessions: SessionRegistry::new(),
            config: Arc::new(test_config()),
        });
        create_router(app_state)
    }

    fn chat_request(msg: &str, session_id: Option<&str>) -> Request<Body> {
        let body = serde_json::json!({ "msg": msg }).to_string();
        let mut builder = Request::builder()
            .method("POST")
            .uri("/get")
            .header("content-type", "application/json");
        if let Some(id) = session_id {
            builder = builder.header("x-session-id", id);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn response_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ChatResponse = serde_json::from_slice(&bytes).unwrap();
        parsed.response
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let router = test_router("unused").await;
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_acknowledgement_gets_redirect_reply() {
        let router = test_router("unused").await;
        let response = router.oneshot(chat_request("thanks", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_text(response).await, REDIRECT_REPLY);
    }

    #[tokio::test]
    async fn test_off_topic_query_gets_refusal() {
        let router = test_router("unused").await;
        let response = router
            .oneshot(chat_request("best pizza in town?", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_text(response).await, REFUSAL_REPLY);
    }

    #[tokio::test]
    async fn test_on_topic_query_gets_generated_reply() {
        let router = test_router("Tables use the <table> tag.").await;
        let response = router
            .oneshot(chat_request("how do i make a table in html?", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_text(response).await, "Tables use the <table> tag.");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_by_header() {
        let router = test_router("Here is an example.").await;

        // Session "a" has one admitted exchange, opening its gate.
        let response = router
            .clone()
            .oneshot(chat_request("how do i make a table in html?", Some("a")))
            .await
            .unwrap();
        assert_eq!(response_text(response).await, "Here is an example.");

        // The open gate admits an unrelated follow-up in session "a"...
        let response = router
            .clone()
            .oneshot(chat_request("asdfqwerty123", Some("a")))
            .await
            .unwrap();
        assert_eq!(response_text(response).await, "Here is an example.");

        // ...while the same query in a fresh session "b" is refused.
        let response = router
            .oneshot(chat_request("asdfqwerty123", Some("b")))
            .await
            .unwrap();
        assert_eq!(response_text(response).await, REFUSAL_REPLY);
    }

    #[tokio::test]
    async fn test_missing_msg_field_is_rejected() {
        let router = test_router("unused").await;
        let request = Request::builder()
            .method("POST")
            .uri("/get")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
