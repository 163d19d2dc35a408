// Ticket check-in endpoint
//
// `POST /events/{event_id}/checkin/` with `{"qr_code": "..."}`. One call
// per redemption attempt and no retry: a repeat attempt is the operator
// presenting the code again.

use tracing::debug;

use crate::auth::BearerToken;
use crate::client::EventGoClient;
use crate::error::Error;
use crate::models::{CheckinBody, CheckinResponse};

impl EventGoClient {
    /// Redeem one ticket code for one event.
    ///
    /// Returns the decoded 200 body for both fresh and repeat check-ins.
    /// Non-2xx statuses come back as [`Error::Authentication`] (401/403)
    /// or [`Error::Api`] with the status and backend message.
    pub async fn check_in(
        &self,
        event_id: u64,
        qr_code: &str,
        token: &BearerToken,
    ) -> Result<CheckinResponse, Error> {
        let url = self.api_url(&format!("events/{event_id}/checkin/"))?;
        debug!(event_id, "POST {}", url);

        let builder = token.apply(self.http().post(url).json(&CheckinBody { qr_code }));
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let resp = self.check_status(resp).await?;

        self.decode(resp).await
    }
}
