use async_trait::async_trait;

use super::types::{AnalysisResponse, BackendError, StoredAnalysis};
use crate::entitlement::EntitlementState;
use crate::request::SubmissionRequest;

/// Seam between the upload workflow and whatever serves it: the HTTP
/// client in production, the simulator in tests and offline runs.
#[async_trait]
pub trait BackendInterface: Send + Sync {
    /// Upload a chart and get the produced analysis back
    async fn submit_chart(
        &self,
        request: &SubmissionRequest,
    ) -> Result<AnalysisResponse, BackendError>;

    /// Current plan, usage and subscription status of the account
    async fn fetch_entitlement(&self) -> Result<EntitlementState, BackendError>;

    /// Stored analyses, newest first
    async fn list_past_analyses(&self) -> Result<Vec<StoredAnalysis>, BackendError>;

    /// Remove one stored analysis
    async fn delete_analysis(&self, id: i64) -> Result<(), BackendError>;
}
