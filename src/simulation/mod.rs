use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::backend::{AnalysisResponse, BackendError, BackendInterface, StoredAnalysis};
use crate::entitlement::{EntitlementState, Plan, SubscriptionStatus};
use crate::request::{AnalysisVariant, SubmissionRequest};

const LIMIT_DETAIL: &str = "Monthly analysis limit reached. Please upgrade your plan.";

/// Simulates the analysis backend for tests and offline runs: plan limits,
/// usage counting and canned producer text, all server-side like the real
/// thing. The client gate is optimistic; this is the authority it defers to.
pub struct BackendSimulator {
    state: Mutex<SimulatorState>,
}

struct SimulatorState {
    plan: Plan,
    subscription_status: SubscriptionStatus,
    analyses_used: u32,
    history: Vec<StoredAnalysis>,
    next_id: i64,
    offline: bool,
}

impl SimulatorState {
    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Transport(
                "simulated connection failure".to_string(),
            ));
        }
        Ok(())
    }
}

fn limit_for(plan: Plan) -> u32 {
    match plan {
        Plan::Free => 3,
        Plan::Pro => 50,
        Plan::Premium => 999_999,
    }
}

/// The server derives the trend label from the first line of producer text.
fn derive_trend(text: &str) -> &'static str {
    match text.lines().next().map(str::trim) {
        Some("UPTREND") | Some("BUY") => "bullish",
        Some("DOWNTREND") | Some("SELL") => "bearish",
        _ => "sideways",
    }
}

/// Canned producer output per variant: standard variants answer in the
/// legacy three-section shape, premium variants in the full seven-section
/// shape with explicit trade levels.
fn canned_analysis(variant: AnalysisVariant) -> (&'static str, &'static str) {
    match variant {
        AnalysisVariant::Swing => (
            "UPTREND\nhigh\nReference: 64,200\nLower: 63,100\nUpper: 66,500\n\
             **Key Levels:**\n\
             * Strong support at 63,000\n\
             * Supply zone near 66,000\n\
             **Pattern Analysis:**\n\
             * Ascending triangle on the 4h\n\
             * Higher lows since the last sweep\n\
             **Risk Assessment:**\n\
             * Probability level: Medium\n\
             * Invalidation on a close below 62,800",
            "high",
        ),
        AnalysisVariant::Scalp => (
            "NEUTRAL\nmedium\nReference: 64,050\nLower: 63,900\nUpper: 64,300\n\
             **Key Levels:**\n\
             * Range floor 63,900\n\
             * Range ceiling 64,300\n\
             **Pattern Analysis:**\n\
             * Compression inside the Asian range\n\
             **Risk Assessment:**\n\
             * Probability level: Low",
            "medium",
        ),
        AnalysisVariant::SwingPremium => (
            "BUY\nhigh\nEntry: 64,450\nSL: 63,200\nTP: 67,800\n\
             **Key Levels:**\n\
             * Support 63,000\n\
             * Supply 66,000\n\
             **Signal Reasons:**\n\
             * Held above the range high after the sweep\n\
             * Volume expanding on green candles\n\
             **Risk Assessment:**\n\
             * Invalidation below 63,000\n\
             **Breakout & Retest:**\n\
             * Wait for a retest of 64,200 before adding\n\
             **Indicators:**\n\
             * RSI 58 with room above\n\
             * Price reclaimed the 20 EMA\n\
             **Fibonacci:**\n\
             * 0.618 pullback held at 63,150\n\
             **Psychology & Plan:**\n\
             * Scale in thirds, no chasing above 65,000",
            "high",
        ),
        AnalysisVariant::ScalpPremium => (
            "SELL\nmedium\nEntry: 64,050\nSL: 64,400\nTP: 63,300\n\
             **Key Levels:**\n\
             * Local supply 64,350\n\
             **Signal Reasons:**\n\
             * Lower highs into the session open\n\
             **Risk Assessment:**\n\
             * Tight stop, size down\n\
             **Breakout & Retest:**\n\
             * Rejected the retest of 64,300\n\
             **Indicators:**\n\
             * RSI fading from 62\n\
             **Fibonacci:**\n\
             * 0.5 retrace capped the bounce\n\
             **Psychology & Plan:**\n\
             * One attempt only, flat before the news",
            "medium",
        ),
    }
}

impl BackendSimulator {
    pub fn new() -> Self {
        // Fresh accounts register as free and inactive
        Self::with_plan(Plan::Free, SubscriptionStatus::Inactive)
    }

    pub fn with_plan(plan: Plan, subscription_status: SubscriptionStatus) -> Self {
        info!("🎞️  Initializing backend simulator ({} plan)", plan.as_str());
        Self {
            state: Mutex::new(SimulatorState {
                plan,
                subscription_status,
                analyses_used: 0,
                history: Vec::new(),
                next_id: 1,
                offline: false,
            }),
        }
    }

    /// Drop the simulated connection; every call fails with a transport
    /// error until it is restored.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    pub async fn set_usage(&self, used: u32) {
        self.state.lock().await.analyses_used = used;
    }
}

impl Default for BackendSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendInterface for BackendSimulator {
    async fn submit_chart(
        &self,
        request: &SubmissionRequest,
    ) -> Result<AnalysisResponse, BackendError> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;

        // Server-side quota check with the authoritative counter
        let limit = limit_for(state.plan);
        if state.analyses_used >= limit {
            warn!(
                "🚫 [SIM] Limit reached ({}/{}), refusing upload",
                state.analyses_used, limit
            );
            return Err(BackendError::Denied {
                detail: LIMIT_DETAIL.to_string(),
            });
        }

        let (text, confidence) = canned_analysis(request.variant);
        let trend = derive_trend(text);
        state.analyses_used += 1;

        let id = state.next_id;
        state.next_id += 1;
        state.history.insert(
            0,
            StoredAnalysis {
                id,
                trend: trend.to_string(),
                confidence: confidence.to_string(),
                analysis_text: text.to_string(),
                created_at: Utc::now().naive_utc(),
            },
        );

        info!(
            "⚡ [SIM] Analyzed {} as {} ({} of {} used)",
            request.image.file_name,
            request.variant.as_str(),
            state.analyses_used,
            limit
        );

        Ok(AnalysisResponse {
            analysis: text.to_string(),
            trend: trend.to_string(),
            confidence: confidence.to_string(),
        })
    }

    async fn fetch_entitlement(&self) -> Result<EntitlementState, BackendError> {
        let state = self.state.lock().await;
        state.ensure_online()?;
        Ok(EntitlementState {
            plan: state.plan,
            subscription_status: state.subscription_status,
            analyses_used: state.analyses_used,
            analyses_limit: limit_for(state.plan),
        })
    }

    async fn list_past_analyses(&self) -> Result<Vec<StoredAnalysis>, BackendError> {
        let state = self.state.lock().await;
        state.ensure_online()?;
        Ok(state.history.clone())
    }

    async fn delete_analysis(&self, id: i64) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;

        let before = state.history.len();
        state.history.retain(|item| item.id != id);
        if state.history.len() == before {
            return Err(BackendError::Api {
                status: 404,
                detail: "Analysis not found".to_string(),
            });
        }
        info!("🗑️ [SIM] Deleted analysis #{}", id);
        Ok(())
    }
}
