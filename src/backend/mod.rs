pub mod api;
pub mod client;
pub mod types;

pub use api::BackendInterface;
pub use client::BackendClient;
pub use types::{AnalysisResponse, BackendError, StoredAnalysis};
