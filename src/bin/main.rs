use admission_helpdesk::{
    agent::AdmissionOfficer,
    config::HelpdeskConfig,
    error::HelpdeskError,
    llm::{OllamaClient, TimeoutModel},
    memory::InMemoryConversationLog,
    state::build_persistent_store,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: helpdesk <student name> <query...>";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(name), query) = (args.next(), args.collect::<Vec<_>>().join(" ")) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };
    if query.trim().is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    match run(&name, &query).await {
        Ok(Some(response)) => {
            println!("\n🎓 {}", response);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("No profile found for '{}'. Please register first.", name);
            ExitCode::FAILURE
        }
        Err(e @ HelpdeskError::Config(_)) => {
            eprintln!("⚠️ {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Query failed: {}", e);
            eprintln!("⚠️ Error processing query. Please try again.");
            ExitCode::FAILURE
        }
    }
}

async fn run(name: &str, query: &str) -> admission_helpdesk::Result<Option<String>> {
    let config = HelpdeskConfig::from_env()?;

    let store = build_persistent_store(config.database_url.as_deref())?;
    let Some(record) = store.get(name).await? else {
        return Ok(None);
    };

    info!(student_id = %record.student_id(), "Student profile loaded");

    let model = TimeoutModel::new(OllamaClient::new(&config.llm)?, config.llm.timeout);
    let officer = AdmissionOfficer::new(Arc::new(model), Arc::new(InMemoryConversationLog::new()));

    officer.process_query(query, &record).await.map(Some)
}
