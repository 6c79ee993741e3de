use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::request::AnalysisVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Premium,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Premium => "premium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
        }
    }
}

/// Plan and usage snapshot as served by `/me`. The workflow only ever reads
/// this; the server owns the counters and this copy goes stale the moment
/// another analysis lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementState {
    pub plan: Plan,
    pub subscription_status: SubscriptionStatus,
    pub analyses_used: u32,
    pub analyses_limit: u32,
}

impl EntitlementState {
    pub fn remaining(&self) -> u32 {
        self.analyses_limit.saturating_sub(self.analyses_used)
    }
}

/// What the client should do with a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RequireUpgrade,
    RequireVariant,
}

/// Decide whether an analysis request may go out, before any network call.
///
/// Optimistic by design: the server re-checks with authoritative counters
/// and its 403 always wins over a local Proceed.
pub fn evaluate(state: &EntitlementState, variant: Option<AnalysisVariant>) -> GateDecision {
    // 1. A variant must be chosen first
    if variant.is_none() {
        warn!("⚠️ Gate: no analysis variant selected");
        return GateDecision::RequireVariant;
    }

    // 2. Free accounts never submit
    if state.plan == Plan::Free {
        warn!("⚠️ Gate: free plan cannot request analyses");
        return GateDecision::RequireUpgrade;
    }

    // 3. Lapsed subscriptions are treated like free
    if state.subscription_status != SubscriptionStatus::Active {
        warn!("⚠️ Gate: subscription is not active");
        return GateDecision::RequireUpgrade;
    }

    // 4. Monthly quota, except premium which is never usage-blocked
    if state.plan != Plan::Premium && state.analyses_used >= state.analyses_limit {
        warn!(
            "⚠️ Gate: monthly limit reached ({}/{})",
            state.analyses_used, state.analyses_limit
        );
        return GateDecision::RequireUpgrade;
    }

    GateDecision::Proceed
}

/// Premium variants are sold separately: a non-premium account picking one
/// is steered to the upgrade surface before any parameter entry. This check
/// runs at selection time and is not part of `evaluate`.
pub fn variant_requires_upgrade(state: &EntitlementState, variant: AnalysisVariant) -> bool {
    variant.is_premium() && state.plan != Plan::Premium
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(plan: Plan, status: SubscriptionStatus, used: u32, limit: u32) -> EntitlementState {
        EntitlementState {
            plan,
            subscription_status: status,
            analyses_used: used,
            analyses_limit: limit,
        }
    }

    #[test]
    fn test_no_variant_blocks_first() {
        let s = state(Plan::Premium, SubscriptionStatus::Active, 0, 999_999);
        assert_eq!(evaluate(&s, None), GateDecision::RequireVariant);
    }

    #[test]
    fn test_free_plan_blocked_regardless_of_counters() {
        let s = state(Plan::Free, SubscriptionStatus::Active, 0, 3);
        assert_eq!(
            evaluate(&s, Some(AnalysisVariant::Swing)),
            GateDecision::RequireUpgrade
        );
    }

    #[test]
    fn test_inactive_subscription_blocked() {
        let s = state(Plan::Pro, SubscriptionStatus::Inactive, 0, 50);
        assert_eq!(
            evaluate(&s, Some(AnalysisVariant::Scalp)),
            GateDecision::RequireUpgrade
        );
    }

    #[test]
    fn test_pro_at_limit_blocked() {
        let s = state(Plan::Pro, SubscriptionStatus::Active, 50, 50);
        assert_eq!(
            evaluate(&s, Some(AnalysisVariant::Swing)),
            GateDecision::RequireUpgrade
        );
    }

    #[test]
    fn test_pro_under_limit_proceeds() {
        let s = state(Plan::Pro, SubscriptionStatus::Active, 49, 50);
        assert_eq!(
            evaluate(&s, Some(AnalysisVariant::Swing)),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_premium_ignores_usage() {
        let s = state(Plan::Premium, SubscriptionStatus::Active, 9999, 50);
        assert_eq!(
            evaluate(&s, Some(AnalysisVariant::SwingPremium)),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_premium_variant_precheck() {
        let pro = state(Plan::Pro, SubscriptionStatus::Active, 0, 50);
        let premium = state(Plan::Premium, SubscriptionStatus::Active, 0, 999_999);

        assert!(variant_requires_upgrade(&pro, AnalysisVariant::SwingPremium));
        assert!(variant_requires_upgrade(&pro, AnalysisVariant::ScalpPremium));
        assert!(!variant_requires_upgrade(&pro, AnalysisVariant::Swing));
        assert!(!variant_requires_upgrade(&premium, AnalysisVariant::SwingPremium));
    }

    #[test]
    fn test_remaining_saturates() {
        let s = state(Plan::Pro, SubscriptionStatus::Active, 60, 50);
        assert_eq!(s.remaining(), 0);
        let s = state(Plan::Pro, SubscriptionStatus::Active, 10, 50);
        assert_eq!(s.remaining(), 40);
    }

    #[test]
    fn test_wire_shape_matches_me_endpoint() {
        let body = r#"{"email":"t@example.com","name":"T","plan":"pro","analyses_used":12,"analyses_limit":50,"subscription_status":"active"}"#;
        let s: EntitlementState = serde_json::from_str(body).unwrap();
        assert_eq!(s.plan, Plan::Pro);
        assert_eq!(s.subscription_status, SubscriptionStatus::Active);
        assert_eq!(s.analyses_used, 12);
        assert_eq!(s.analyses_limit, 50);
    }
}
