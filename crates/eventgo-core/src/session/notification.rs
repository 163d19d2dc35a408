use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{OutcomeCategory, RedemptionOutcome, RedemptionRequest};

/// What the operator is told about one redemption attempt.
///
/// Exactly one is broadcast per submitted request, before the scanner
/// re-arms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub request: RedemptionRequest,
    pub outcome: RedemptionOutcome,
    pub category: OutcomeCategory,
    pub message: String,
    /// The operator must log in again before further scans can succeed.
    pub reauth_required: bool,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(request: RedemptionRequest, outcome: RedemptionOutcome, at: DateTime<Utc>) -> Self {
        Self {
            category: outcome.category(),
            message: outcome.to_string(),
            reauth_required: outcome.requires_reauth(),
            request,
            outcome,
            at,
        }
    }
}
