mod config;
mod repl;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use tutor_client::{FileTokenStore, HttpTutorClient, SessionGuard, TutorBackend};
use tutor_types::TopicId;
use tutor_workflow::{DirectorySink, TopicSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    let topic_id: TopicId = std::env::args()
        .nth(1)
        .context("Usage: tutor-cli <topic-id>")?
        .parse()
        .context("Topic id must be an integer")?;

    tracing::info!("Backend: {}", config.backend.base_url);

    let session = SessionGuard::new(FileTokenStore::new(&config.session.token_path));
    let client = Arc::new(
        HttpTutorClient::new(config.backend.base_url.clone(), session.clone())
            .context("Failed to create HTTP client")?,
    );

    if !session.is_authenticated() {
        let credentials = config
            .credentials()
            .context("Not logged in: set TUTOR_EMAIL and TUTOR_PASSWORD")?;
        client
            .login(&credentials)
            .await
            .context("Error logging in")?;
    }

    let sink = Arc::new(DirectorySink::new(config.downloads.directory.clone()));
    let topic_session = TopicSession::open(client, sink, topic_id)
        .await
        .with_context(|| format!("Failed to open topic {}", topic_id))?;

    repl::run(topic_session).await
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
