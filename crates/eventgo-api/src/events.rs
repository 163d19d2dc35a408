// Event lookup endpoint

use tracing::debug;

use crate::auth::BearerToken;
use crate::client::EventGoClient;
use crate::error::Error;
use crate::models::EventDetail;

impl EventGoClient {
    /// Fetch one event's detail record.
    ///
    /// The endpoint is public; the token is sent when available so
    /// organizer-only fields are included.
    pub async fn event_detail(
        &self,
        event_id: u64,
        token: Option<&BearerToken>,
    ) -> Result<EventDetail, Error> {
        let url = self.api_url(&format!("events/{event_id}/detail/"))?;
        debug!(event_id, "GET {}", url);

        let mut builder = self.http().get(url);
        if let Some(token) = token {
            builder = token.apply(builder);
        }
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let resp = self.check_status(resp).await?;

        self.decode(resp).await
    }
}
