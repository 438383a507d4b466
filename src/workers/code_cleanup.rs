use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::modules::auth::interface::VerificationCodeRepository;

/// Periodic sweep deleting expired verification codes. Expired rows are
/// already unusable; this keeps the table from growing without bound.
pub fn spawn_code_cleanup(
    codes: Arc<dyn VerificationCodeRepository>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so the sweep starts one
        // full interval after boot.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match codes.delete_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(deleted) => {
                    tracing::info!(deleted, "purged expired verification codes");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "expired code sweep failed");
                }
            }
        }
    })
}
