// ── Redemption client seam ──
//
// The session talks to the network through `Redeemer`, so the state
// machine can be driven by a scripted fake in tests. The production
// implementation is `EventGoClient`.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use eventgo_api::{BearerToken, EventGoClient};

use crate::convert::classify;
use crate::model::{RedemptionOutcome, RedemptionRequest};

/// Submits one redemption request and classifies the result.
///
/// Implementations never fail: every transport or protocol problem is
/// folded into a [`RedemptionOutcome`]. No caching and no retries.
pub trait Redeemer: Send + Sync + 'static {
    fn redeem(
        &self,
        request: &RedemptionRequest,
        token: &BearerToken,
    ) -> impl Future<Output = RedemptionOutcome> + Send;
}

impl Redeemer for EventGoClient {
    async fn redeem(&self, request: &RedemptionRequest, token: &BearerToken) -> RedemptionOutcome {
        debug!(event_id = %request.event_id, "submitting redemption");
        let outcome = classify(
            self.check_in(request.event_id.get(), &request.code, token)
                .await,
        );
        info!(
            event_id = %request.event_id,
            outcome = outcome.kind(),
            "redemption classified"
        );
        outcome
    }
}

impl<T: Redeemer> Redeemer for Arc<T> {
    fn redeem(
        &self,
        request: &RedemptionRequest,
        token: &BearerToken,
    ) -> impl Future<Output = RedemptionOutcome> + Send {
        (**self).redeem(request, token)
    }
}
