use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use interview_backend::{
    build_router,
    config::{get_config, init_config},
    database::{pool, InterviewStore, MemoryStore, PgStore},
    services::llm_service::{ChatCompletionClient, LanguageModel, LlmService},
    AppState,
};
use reqwest::Client;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let store: Arc<dyn InterviewStore> = match &config.database_url {
        Some(url) => {
            let db = pool::create_pool(url).await?;
            pool::run_migrations(&db).await?;
            info!("Connected to Postgres, migrations applied");
            Arc::new(PgStore::new(db))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let timeout = Duration::from_secs(config.llm_timeout_secs);
    let llm = match &config.llm_api_key {
        Some(key) => {
            let http_client = Client::builder().timeout(timeout).build()?;
            let model: Arc<dyn LanguageModel> = Arc::new(ChatCompletionClient::new(
                http_client,
                config.llm_api_url.clone(),
                key.clone(),
                config.llm_model.clone(),
            ));
            info!(model = %config.llm_model, "Language model enabled");
            LlmService::new(Some(model), timeout)
        }
        None => {
            warn!("No LLM API key configured, questions and scores use deterministic fallbacks");
            LlmService::new(None, timeout)
        }
    };

    let app_state = AppState::new(store, llm, config.question_count)?;
    let app = build_router(app_state, config.public_rps);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
