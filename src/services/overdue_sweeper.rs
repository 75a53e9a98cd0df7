//! Periodic overdue sweep

use sea_orm::DatabaseConnection;
use std::time::Duration;

use crate::services::loan_service;

/// Pause after a failed sweep before trying again
const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Run the overdue sweep forever, every `interval`.
pub async fn run_sweeper(db: DatabaseConnection, interval: Duration) {
    tracing::info!(interval_secs = interval.as_secs(), "Overdue sweeper started");

    loop {
        match loan_service::mark_overdue(&db).await {
            Ok(count) => {
                tracing::debug!(count, "Overdue sweep finished");
                tokio::time::sleep(interval).await;
            }
            Err(e) => {
                tracing::error!("Overdue sweep failed: {}", e);
                tokio::time::sleep(RETRY_DELAY.min(interval)).await;
            }
        }
    }
}
