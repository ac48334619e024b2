use admission_helpdesk::{
    agent::AdmissionOfficer,
    api::start_server,
    config::HelpdeskConfig,
    llm::{OllamaClient, TimeoutModel},
    memory::InMemoryConversationLog,
    state::build_store,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = HelpdeskConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🎓 Admission Helpdesk - API Server");
    info!("📍 Port: {}", config.port);

    // Create components
    let client = OllamaClient::new(&config.llm)?;
    info!("🧠 Model: {} @ {}", client.model(), config.llm.base_url);

    let model = TimeoutModel::new(client, config.llm.timeout);
    let store = build_store(config.database_url.as_deref());
    let conversation_log = Arc::new(InMemoryConversationLog::new());

    let officer = Arc::new(AdmissionOfficer::new(Arc::new(model), conversation_log));

    info!("✅ Admission officer initialized");
    info!("📡 Starting API server...");

    start_server(officer, store, config.port).await?;

    Ok(())
}
