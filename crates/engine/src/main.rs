//! Admin tool: clone every aggregate one user owns into another account.
//!
//! Usage: set `SOURCE_USER_ID`, `DEST_USER_ID`, and optionally
//! `CLONE_LABEL`, then run. Prints a summary of created counts and
//! per-entity failures.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lorebound_engine::config::EngineConfig;
use lorebound_engine::copier::clone_user_content;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lorebound_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();
    let pool = lorebound_db::create_pool(&config.database_url, config.max_connections).await?;

    let source_user_id: i64 = std::env::var("SOURCE_USER_ID")?.parse()?;
    let dest_user_id: i64 = std::env::var("DEST_USER_ID")?.parse()?;
    let label = std::env::var("CLONE_LABEL").unwrap_or_else(|_| format!("user {source_user_id}"));

    tracing::info!(source_user_id, dest_user_id, label = %label, "starting account clone");
    let report = clone_user_content(&pool, source_user_id, dest_user_id, &label).await?;

    for (kind, count) in &report.created {
        tracing::info!(kind = %kind, count, "created");
    }
    for failure in &report.errors {
        tracing::warn!(
            kind = %failure.kind,
            source_id = failure.source_id,
            message = %failure.message,
            "entity failed"
        );
    }
    if report.has_errors() {
        tracing::warn!(errors = report.errors.len(), "clone finished with failures");
    } else {
        tracing::info!("clone finished cleanly");
    }
    Ok(())
}
