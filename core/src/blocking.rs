//! Network-facing client: builds, executes and parses in one call.

use chrono::NaiveDate;
use serde_json::Value;

use crate::client::PmsClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::RateEntry;

/// Runs each `PmsClient` operation through a [`Transport`], one request at a
/// time.
#[derive(Debug, Clone)]
pub struct BlockingClient<T = UreqTransport> {
    client: PmsClient,
    transport: T,
}

impl BlockingClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: PmsClient::new(config),
            transport,
        }
    }

    pub fn inner(&self) -> &PmsClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fetch account information.
    pub fn get_account_information(&self) -> Result<Value, ApiError> {
        let response = self.send(self.client.build_get_account()?)?;
        self.client.parse_get_account(response)
    }

    /// Fetch the ids of every listing on the account.
    pub fn get_listing_ids(&self) -> Result<Value, ApiError> {
        let response = self.send(self.client.build_get_listing_ids()?)?;
        self.client.parse_get_listing_ids(response)
    }

    pub fn get_listing_by_id(&self, listing_id: &str) -> Result<Value, ApiError> {
        let response = self.send(self.client.build_get_listing(listing_id)?)?;
        self.client.parse_get_listing(listing_id, response)
    }

    pub fn get_calendar_by_listing_id(&self, listing_id: &str) -> Result<Value, ApiError> {
        let response = self.send(self.client.build_get_calendar(listing_id)?)?;
        self.client.parse_get_calendar(listing_id, response)
    }

    /// Post a rates batch. Returns an empty list on success.
    pub fn post_rates(&self, listing_id: &str, rates: &[RateEntry]) -> Result<Vec<Value>, ApiError> {
        let response = self.send(self.client.build_post_rates(listing_id, rates)?)?;
        self.client.parse_post_rates(listing_id, response)
    }

    pub fn get_reservations_by_listing_id(
        &self,
        listing_id: &str,
        checkin_start_date: Option<NaiveDate>,
    ) -> Result<Value, ApiError> {
        let request = self
            .client
            .build_get_reservations(listing_id, checkin_start_date)?;
        let response = self.send(request)?;
        self.client.parse_get_reservations(listing_id, response)
    }

    pub fn get_reservation(&self, reservation_id: &str) -> Result<Value, ApiError> {
        let response = self.send(self.client.build_get_reservation(reservation_id)?)?;
        self.client.parse_get_reservation(reservation_id, response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(&request)?;
        tracing::debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }
}
