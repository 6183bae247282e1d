//! Main Entrypoint for the Tutor API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading the syllabus and prompt templates.
//! 3. Initializing shared services and precomputing syllabus embeddings.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use std::{collections::HashMap, fs, net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tutor_api::{
    config::{Config, Provider},
    router::create_router,
    sessions::SessionRegistry,
    state::AppState,
};
use tutor_core::{
    embedding::{EmbeddingService, OpenAIEmbeddingService, TopicEmbeddings},
    gate::RelevanceGate,
    llm_client::{LLMClient, OpenAICompatibleClient},
    syllabus::Syllabus,
    tutor::{TutorService, render_system_prompt},
};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// A helper function to load prompts from a directory.
fn load_prompts(prompts_path: &std::path::Path) -> anyhow::Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();
    for entry in std::fs::read_dir(prompts_path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem")?
                .to_string();
            let content = fs::read_to_string(&path)?;
            prompts.insert(prompt_key, content);
        }
    }
    Ok(prompts)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load Syllabus and Prompts ---
    let syllabus = Syllabus::load(&config.syllabus_path)?;
    info!(
        topics = syllabus.topics().len(),
        "Syllabus loaded from {}",
        config.syllabus_path.display()
    );

    let prompts = load_prompts(&config.prompts_path)?;
    let template = prompts
        .get("system_prompt")
        .context("system_prompt.md not found in prompts directory")?;
    let system_prompt = render_system_prompt(template, &syllabus);

    // --- 4. Initialize Shared Services ---
    let (embedding_service, llm_client): (Arc<dyn EmbeddingService>, Arc<dyn LLMClient>) =
        match &config.provider {
            Provider::OpenAI => {
                info!("Using OpenAI provider.");
                let api_key = config.openai_api_key.as_ref().unwrap();
                let openai_config = OpenAIConfig::new()
                    .with_api_key(api_key)
                    .with_api_base("https://api.openai.com/v1/");
                (
                    Arc::new(OpenAIEmbeddingService::new(
                        openai_config.clone(),
                        config.embedding_model.clone(),
                    )),
                    Arc::new(OpenAICompatibleClient::new(
                        openai_config,
                        config.chat_model.clone(),
                    )),
                )
            }
            Provider::Gemini => {
                info!("Using Gemini provider.");
                let api_key = config.gemini_api_key.as_ref().unwrap();
                let openai_config = OpenAIConfig::new()
                    .with_api_key(api_key)
                    .with_api_base("https://generativelanguage.googleapis.com/v1beta/openai");
                (
                    Arc::new(OpenAIEmbeddingService::new(
                        openai_config.clone(),
                        config.embedding_model.clone(),
                    )),
                    Arc::new(OpenAICompatibleClient::new(
                        openai_config,
                        config.chat_model.clone(),
                    )),
                )
            }
        };

    // --- 5. Precompute Syllabus Embeddings ---
    let topics = Arc::new(
        TopicEmbeddings::build(embedding_service.as_ref(), &syllabus)
            .await
            .context("Failed to precompute syllabus embeddings")?,
    );

    let gate = RelevanceGate::new(embedding_service, topics, config.similarity_threshold);
    let tutor = Arc::new(TutorService::new(gate, llm_client, system_prompt));

    let app_state = Arc::new(AppState {
        tutor,
        sessions: SessionRegistry::new(),
        config: Arc::new(config.clone()),
    });

    // --- 6. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 7. Start Server ---
    info!(
        provider = ?config.provider,
        chat_model = %config.chat_model,
        embedding_model = %config.embedding_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
