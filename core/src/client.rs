//! Stateless HTTP request builder and response parser for the vendor API.
//!
//! # Design
//! `PmsClient` holds only its configuration and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `BlockingClient` glues the two halves to a transport.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::status::{classify, Operation};
use crate::types::RateEntry;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter used to filter reservations by check-in date.
pub const CHECKIN_START_DATE: &str = "checkinStartDate";

/// Synchronous, stateless client for the vendor API.
#[derive(Debug, Clone)]
pub struct PmsClient {
    config: ClientConfig,
}

impl PmsClient {
    pub fn new(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn build_get_account(&self) -> Result<HttpRequest, ApiError> {
        self.request(Operation::GetAccount, &[])
    }

    pub fn build_get_listing_ids(&self) -> Result<HttpRequest, ApiError> {
        self.request(Operation::GetListingIds, &[])
    }

    pub fn build_get_listing(&self, listing_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(Operation::GetListing, &[("listing_id", listing_id)])
    }

    pub fn build_get_calendar(&self, listing_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(Operation::GetCalendar, &[("listing_id", listing_id)])
    }

    pub fn build_post_rates(
        &self,
        listing_id: &str,
        rates: &[RateEntry],
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(rates).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = self.request(Operation::PostRates, &[("listing_id", listing_id)])?;
        request
            .headers
            .insert(0, ("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    pub fn build_get_reservations(
        &self,
        listing_id: &str,
        checkin_start_date: Option<NaiveDate>,
    ) -> Result<HttpRequest, ApiError> {
        let mut request =
            self.request(Operation::GetListingReservations, &[("listing_id", listing_id)])?;
        if let Some(date) = checkin_start_date {
            request
                .query
                .push((CHECKIN_START_DATE.to_string(), date.format("%Y-%m-%d").to_string()));
        }
        Ok(request)
    }

    pub fn build_get_reservation(&self, reservation_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(Operation::GetReservation, &[("reservation_id", reservation_id)])
    }

    pub fn parse_get_account(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.check_status(Operation::GetAccount, "", &response)?;
        decode(&response)
    }

    pub fn parse_get_listing_ids(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.check_status(Operation::GetListingIds, "", &response)?;
        decode(&response)
    }

    pub fn parse_get_listing(
        &self,
        listing_id: &str,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        self.check_status(Operation::GetListing, listing_id, &response)?;
        decode(&response)
    }

    pub fn parse_get_calendar(
        &self,
        listing_id: &str,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        self.check_status(Operation::GetCalendar, listing_id, &response)?;
        decode(&response)
    }

    /// The vendor's response body is discarded; success is always an empty list.
    pub fn parse_post_rates(
        &self,
        listing_id: &str,
        response: HttpResponse,
    ) -> Result<Vec<Value>, ApiError> {
        self.check_status(Operation::PostRates, listing_id, &response)?;
        Ok(Vec::new())
    }

    pub fn parse_get_reservations(
        &self,
        listing_id: &str,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        self.check_status(Operation::GetListingReservations, listing_id, &response)?;
        decode(&response)
    }

    pub fn parse_get_reservation(
        &self,
        reservation_id: &str,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        self.check_status(Operation::GetReservation, reservation_id, &response)?;
        decode(&response)
    }

    fn request(
        &self,
        operation: Operation,
        params: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let path = operation.route().render(params)?;
        let method = match operation {
            Operation::PostRates => HttpMethod::Post,
            _ => HttpMethod::Get,
        };
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url),
            headers: self.headers(),
            query: Vec::new(),
            body: None,
        })
    }

    /// Caller headers first, then the fixed set, which replaces any caller
    /// entry with the same name.
    fn headers(&self) -> Vec<(String, String)> {
        let fixed = [
            (API_KEY_HEADER, self.config.api_key.as_str()),
            ("accept", "application/json"),
            ("accept-encoding", "gzip, deflate"),
        ];
        let mut headers: Vec<(String, String)> = self
            .config
            .default_headers
            .iter()
            .filter(|(name, _)| !fixed.iter().any(|(f, _)| name.eq_ignore_ascii_case(f)))
            .cloned()
            .collect();
        headers.extend(fixed.iter().map(|(n, v)| (n.to_string(), v.to_string())));
        headers
    }

    /// Run the status rules for `operation` and turn a hit into an `ApiError`.
    /// `subject` is the listing or reservation id the call addressed.
    fn check_status(
        &self,
        operation: Operation,
        subject: &str,
        response: &HttpResponse,
    ) -> Result<(), ApiError> {
        let status = response.status;
        let Some(kind) = classify(operation, status, &self.config.allowed_statuses) else {
            tracing::debug!(?operation, status, "response accepted");
            return Ok(());
        };
        tracing::debug!(?operation, status, %kind, "response rejected");

        let body = response.body.clone();
        Err(match kind {
            ErrorKind::ServerError => ApiError::ServerError { body },
            ErrorKind::BadRequest => ApiError::BadRequest { body },
            ErrorKind::InvalidCredentials => ApiError::InvalidCredentials { status, body },
            ErrorKind::PropertyNotFound => ApiError::PropertyNotFound {
                listing_id: subject.to_string(),
                body,
            },
            ErrorKind::ReservationNotFound => ApiError::ReservationNotFound {
                reservation_id: subject.to_string(),
                body,
            },
            ErrorKind::PostingRates => ApiError::PostingRates {
                listing_id: subject.to_string(),
                body,
            },
            _ => ApiError::UnexpectedStatus {
                status,
                message: format!(
                    "response status code was {status}, allowed status codes are: {:?}",
                    self.config.allowed_statuses
                ),
                response: response.clone(),
            },
        })
    }
}

fn decode(response: &HttpResponse) -> Result<Value, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
