//! # Conformance scenarios
//!
//! Each scenario drives the client through one endpoint, either on the happy
//! path (payload checked against its schema) or on an error path (a specific
//! `ErrorKind` must come back). Scenarios run one after another in
//! [`Scenario::ALL`] order and never share data: one that needs a listing id
//! fetches it itself.
//!
//! Nothing here aborts a run. A client error on the happy path, an
//! unexpected error kind or a missing prerequisite all become a fail line.

use std::io::{self, Write};

use chrono::{Duration, NaiveDate};
use pms_core::{ApiError, BlockingClient, ErrorKind, RateEntry, Transport, Weekday};
use serde_json::Value;

use crate::report::{Report, ReportWriter, ScenarioReport};
use crate::schemas::{SchemaName, SchemaSet};

/// Identifier the vendor cannot know.
pub const INVALID_ID: &str = "invalid-id";
pub const INVALID_API_KEY: &str = "invalid-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    AccountOk,
    AccountUnauthorized,
    ListingIdsOk,
    ListingOk,
    ListingNotFound,
    CalendarOk,
    CalendarNotFound,
    ListingReservationsOk,
    ListingReservationsNotFound,
    ReservationOk,
    ReservationNotFound,
    PostRatesCreated,
    PostRatesNotFound,
}

impl Scenario {
    pub const ALL: [Scenario; 13] = [
        Scenario::AccountOk,
        Scenario::AccountUnauthorized,
        Scenario::ListingIdsOk,
        Scenario::ListingOk,
        Scenario::ListingNotFound,
        Scenario::CalendarOk,
        Scenario::CalendarNotFound,
        Scenario::ListingReservationsOk,
        Scenario::ListingReservationsNotFound,
        Scenario::ReservationOk,
        Scenario::ReservationNotFound,
        Scenario::PostRatesCreated,
        Scenario::PostRatesNotFound,
    ];

    /// Report label before identifiers are known.
    pub fn label(self) -> &'static str {
        match self {
            Scenario::AccountOk => "GET /account status:200",
            Scenario::AccountUnauthorized => "GET /account status:401",
            Scenario::ListingIdsOk => "GET /listings status:200",
            Scenario::ListingOk => "GET /listings/{listing_id} status:200",
            Scenario::ListingNotFound => "GET /listings/invalid-id status:404",
            Scenario::CalendarOk => "GET /listings/{listing_id}/calendar status:200",
            Scenario::CalendarNotFound => "GET /listings/invalid-id/calendar status:404",
            Scenario::ListingReservationsOk => "GET /listings/{listing_id}/reservations status:200",
            Scenario::ListingReservationsNotFound => {
                "GET /listings/invalid-id/reservations status:404"
            }
            Scenario::ReservationOk => "GET /reservations/{reservation_id} status:200",
            Scenario::ReservationNotFound => "GET /reservations/invalid-id status:404",
            Scenario::PostRatesCreated => "POST /listings/{listing_id}/calendar status:201",
            Scenario::PostRatesNotFound => "POST /listings/invalid-id/calendar status:404",
        }
    }

    fn label_for(self, id: &str) -> String {
        self.label()
            .replace("{listing_id}", id)
            .replace("{reservation_id}", id)
    }
}

/// Runs scenarios against one client.
pub struct Checker<'a, T> {
    client: &'a BlockingClient<T>,
    schemas: &'a SchemaSet,
    today: NaiveDate,
}

impl<'a, T: Transport> Checker<'a, T> {
    pub fn new(client: &'a BlockingClient<T>, schemas: &'a SchemaSet) -> Self {
        Self::with_today(client, schemas, chrono::Local::now().date_naive())
    }

    /// `today` anchors the dates of the synthetic rates batch.
    pub fn with_today(client: &'a BlockingClient<T>, schemas: &'a SchemaSet, today: NaiveDate) -> Self {
        Self {
            client,
            schemas,
            today,
        }
    }

    /// Run every scenario in order, writing each line to `out` as it completes.
    pub fn run_all<W: Write>(&self, out: W) -> io::Result<Report> {
        let mut writer = ReportWriter::new(out);
        for scenario in Scenario::ALL {
            writer.record(self.run(scenario))?;
        }
        let report = writer.finish();
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            "conformance run finished"
        );
        Ok(report)
    }

    pub fn run(&self, scenario: Scenario) -> ScenarioReport {
        tracing::debug!(scenario = scenario.label(), "running scenario");
        let client = self.client;
        let report = match scenario {
            Scenario::AccountOk => self.check_payload(
                scenario.label(),
                SchemaName::Account,
                client.get_account_information(),
            ),
            Scenario::AccountUnauthorized => self.account_unauthorized(),
            Scenario::ListingIdsOk => self.check_payload(
                scenario.label(),
                SchemaName::ListingIds,
                client.get_listing_ids(),
            ),
            Scenario::ListingOk => self.with_listing(scenario, |id| {
                (SchemaName::Listing, client.get_listing_by_id(id))
            }),
            Scenario::ListingNotFound => expect_error(
                scenario.label(),
                ErrorKind::PropertyNotFound,
                client.get_listing_by_id(INVALID_ID),
            ),
            Scenario::CalendarOk => self.with_listing(scenario, |id| {
                (SchemaName::Calendar, client.get_calendar_by_listing_id(id))
            }),
            Scenario::CalendarNotFound => expect_error(
                scenario.label(),
                ErrorKind::PropertyNotFound,
                client.get_calendar_by_listing_id(INVALID_ID),
            ),
            Scenario::ListingReservationsOk => self.with_listing(scenario, |id| {
                (
                    SchemaName::ReservationList,
                    client.get_reservations_by_listing_id(id, None),
                )
            }),
            Scenario::ListingReservationsNotFound => expect_error(
                scenario.label(),
                ErrorKind::PropertyNotFound,
                client.get_reservations_by_listing_id(INVALID_ID, None),
            ),
            Scenario::ReservationOk => self.reservation_ok(),
            Scenario::ReservationNotFound => expect_error(
                scenario.label(),
                ErrorKind::ReservationNotFound,
                client.get_reservation(INVALID_ID),
            ),
            Scenario::PostRatesCreated => {
                let rates = synthetic_rates(self.today);
                self.with_listing(scenario, |id| {
                    (
                        SchemaName::Calendar,
                        client.post_rates(id, &rates).map(Value::Array),
                    )
                })
            }
            Scenario::PostRatesNotFound => expect_error(
                scenario.label(),
                ErrorKind::PropertyNotFound,
                client.post_rates(INVALID_ID, &[]),
            ),
        };
        tracing::debug!(scenario = scenario.label(), passed = report.passed, "scenario finished");
        report
    }

    fn check_payload(
        &self,
        context: impl Into<String>,
        schema: SchemaName,
        payload: Result<Value, ApiError>,
    ) -> ScenarioReport {
        match payload {
            Ok(payload) => {
                ScenarioReport::from_violations(context, self.schemas.validate(schema, &payload))
            }
            Err(e) => ScenarioReport::fail(context, e.to_string()),
        }
    }

    /// Fetch the first listing id, then validate whatever `call` returns for it.
    fn with_listing<F>(&self, scenario: Scenario, call: F) -> ScenarioReport
    where
        F: FnOnce(&str) -> (SchemaName, Result<Value, ApiError>),
    {
        match self.first_listing_id() {
            Ok(id) => {
                let (schema, payload) = call(&id);
                self.check_payload(scenario.label_for(&id), schema, payload)
            }
            Err(missing) => ScenarioReport::fail(scenario.label(), missing),
        }
    }

    fn first_listing_id(&self) -> Result<String, String> {
        let ids = self
            .client
            .get_listing_ids()
            .map_err(|e| format!("couldn't fetch a listing id: GET /listings failed: {e}"))?;
        let Some(ids) = ids.as_array() else {
            return Err("couldn't fetch a listing id: GET /listings did not return a list".to_string());
        };
        match ids.first() {
            None => Err("couldn't fetch a listing id: GET /listings returned no listings".to_string()),
            Some(Value::String(id)) => Ok(id.clone()),
            Some(other) => Err(format!(
                "couldn't fetch a listing id: GET /listings returned a non-string id {other}"
            )),
        }
    }

    fn account_unauthorized(&self) -> ScenarioReport {
        let config = self.client.inner().config().with_api_key(INVALID_API_KEY);
        let invalid = BlockingClient::with_transport(config, self.client.transport());
        expect_error(
            Scenario::AccountUnauthorized.label(),
            ErrorKind::InvalidCredentials,
            invalid.get_account_information(),
        )
    }

    fn reservation_ok(&self) -> ScenarioReport {
        let scenario = Scenario::ReservationOk;
        let listing_id = match self.first_listing_id() {
            Ok(id) => id,
            Err(missing) => return ScenarioReport::fail(scenario.label(), missing),
        };

        let reservations = match self.client.get_reservations_by_listing_id(&listing_id, None) {
            Ok(reservations) => reservations,
            Err(e) => {
                return ScenarioReport::fail(
                    scenario.label(),
                    format!("couldn't fetch a reservation id: GET /listings/{listing_id}/reservations failed: {e}"),
                )
            }
        };
        let Some(reservations) = reservations.as_array() else {
            return ScenarioReport::fail(
                scenario.label(),
                format!("couldn't fetch a reservation id: GET /listings/{listing_id}/reservations did not return a list"),
            );
        };
        let Some(first) = reservations.first() else {
            return ScenarioReport::fail(
                scenario.label(),
                format!("couldn't fetch a reservation id: GET /listings/{listing_id}/reservations returned no reservations"),
            );
        };
        let Some(reservation_id) = first.get("id").and_then(Value::as_str) else {
            return ScenarioReport::fail(
                scenario.label(),
                format!("couldn't fetch a reservation id: first reservation of listing {listing_id} has no string id"),
            );
        };

        self.check_payload(
            scenario.label_for(reservation_id),
            SchemaName::Reservation,
            self.client.get_reservation(reservation_id),
        )
    }
}

/// Pass only when `result` failed with exactly `expected`.
fn expect_error<V>(context: &str, expected: ErrorKind, result: Result<V, ApiError>) -> ScenarioReport {
    match result {
        Err(e) if e.kind() == expected => ScenarioReport::pass(context),
        Err(e) => ScenarioReport::fail(context, format!("expected {expected}, got {}: {e}", e.kind())),
        Ok(_) => ScenarioReport::fail(context, format!("expected {expected}, got a successful response")),
    }
}

/// Three days of rates starting tomorrow; the last one carries extra-guest
/// pricing.
pub fn synthetic_rates(today: NaiveDate) -> Vec<RateEntry> {
    let day = |offset: i64| today + Duration::days(offset);
    vec![
        RateEntry {
            date: day(1),
            daily_price: 296.0,
            min_nights: 3,
            checkin_days: vec![Weekday::Saturday],
            checkout_days: vec![Weekday::Saturday],
            extra_guests: None,
            extra_guest_fee: None,
        },
        RateEntry {
            date: day(2),
            daily_price: 296.0,
            min_nights: 3,
            checkin_days: vec![Weekday::Saturday, Weekday::Friday],
            checkout_days: vec![Weekday::Saturday],
            extra_guests: None,
            extra_guest_fee: None,
        },
        RateEntry {
            date: day(3),
            daily_price: 433.0,
            min_nights: 2,
            checkin_days: vec![Weekday::Saturday],
            checkout_days: vec![Weekday::Saturday],
            extra_guests: Some(2),
            extra_guest_fee: Some(156.0),
        },
    ]
}
