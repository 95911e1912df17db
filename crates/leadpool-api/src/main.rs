//! Open leads pool REST API server.

use leadpool_api::config::ApiConfig;
use leadpool_api::server::{self, AppState};
use leadpool_engine::ReassignmentPool;
use leadpool_store::{InMemoryAuditStore, InMemoryLeadStore, JsonlAuditStore};
use leadpool_types::{AuditStore, Lead, LeadStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    let leads = Arc::new(InMemoryLeadStore::new());
    if let Some(ref path) = config.seed_path {
        let raw = tokio::fs::read_to_string(path).await?;
        let seed: Vec<Lead> = serde_json::from_str(&raw)?;
        let count = seed.len();
        for lead in seed {
            leads.insert(lead).await?;
        }
        tracing::info!(count, path = %path.display(), "seeded leads");
    }

    let audit_log: Arc<dyn AuditStore> = match config.audit_log_path {
        Some(ref path) => {
            tracing::info!(path = %path.display(), "audit log: jsonl");
            Arc::new(JsonlAuditStore::new(path))
        }
        None => Arc::new(InMemoryAuditStore::new()),
    };

    let pool = ReassignmentPool::new(leads, Arc::clone(&audit_log)).with_config(config.pool.clone());
    let state = Arc::new(AppState {
        pool: Arc::new(pool),
        audit_log,
    });

    let app = server::router(state);
    tracing::info!("open leads pool API listening on {}", config.listen_addr);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen_addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
