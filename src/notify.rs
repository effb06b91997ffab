//! Operator notification seam.

use async_trait::async_trait;

use crate::error::SeekerResult;

/// Delivers user reports to a fixed operator destination.
///
/// Fire-and-forget from the dialog flow's perspective: callers log a
/// delivery failure and move on.
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    async fn notify(&self, text: &str) -> SeekerResult<()>;
}

/// Fallback notifier that only logs. Used when no operator channel is
/// configured (local runs, tests).
pub struct LogNotifier;

#[async_trait]
impl OperatorNotifier for LogNotifier {
    async fn notify(&self, text: &str) -> SeekerResult<()> {
        log::info!("📨 Operator report: {}", text);
        Ok(())
    }
}
