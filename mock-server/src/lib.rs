pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub use fixtures::{
    Account, Address, CalendarDay, Fixtures, Listing, RateUpdate, Reservation,
};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

type Failure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, message: impl Into<String>) -> Failure {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

#[derive(Debug)]
pub struct Store {
    pub account: Account,
    pub listings: Vec<Listing>,
    pub calendars: HashMap<String, Vec<CalendarDay>>,
    pub reservations: Vec<Reservation>,
}

impl From<Fixtures> for Store {
    fn from(fixtures: Fixtures) -> Self {
        Self {
            account: fixtures.account,
            listings: fixtures.listings,
            calendars: fixtures.calendars.into_iter().collect(),
            reservations: fixtures.reservations,
        }
    }
}

impl Store {
    fn has_listing(&self, id: &str) -> bool {
        self.listings.iter().any(|l| l.id == id)
    }
}

pub struct MockState {
    api_key: String,
    store: RwLock<Store>,
}

pub type Db = Arc<MockState>;

/// Router over the sample fixtures, accepting [`DEFAULT_API_KEY`].
pub fn app() -> Router {
    app_with(DEFAULT_API_KEY, Fixtures::sample())
}

pub fn app_with(api_key: &str, fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(MockState {
        api_key: api_key.to_string(),
        store: RwLock::new(fixtures.into()),
    });
    Router::new()
        .route("/account", get(get_account))
        .route("/listings", get(list_listing_ids))
        .route("/listings/{id}", get(get_listing))
        .route("/listings/{id}/calendar", get(get_calendar).post(post_rates))
        .route("/listings/{id}/reservations", get(list_reservations))
        .route("/reservations/{id}", get(get_reservation))
        .layer(middleware::from_fn_with_state(db.clone(), require_api_key))
        .with_state(db)
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn require_api_key(State(db): State<Db>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided != Some(db.api_key.as_str()) {
        return failure(StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    next.run(request).await
}

async fn get_account(State(db): State<Db>) -> Json<Account> {
    Json(db.store.read().await.account.clone())
}

async fn list_listing_ids(State(db): State<Db>) -> Json<Vec<String>> {
    let store = db.store.read().await;
    Json(store.listings.iter().map(|l| l.id.clone()).collect())
}

async fn get_listing(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, Failure> {
    let store = db.store.read().await;
    store
        .listings
        .iter()
        .find(|l| l.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("listing {id} not found")))
}

async fn get_calendar(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CalendarDay>>, Failure> {
    let store = db.store.read().await;
    if !store.has_listing(&id) {
        return Err(failure(StatusCode::NOT_FOUND, format!("listing {id} not found")));
    }
    Ok(Json(store.calendars.get(&id).cloned().unwrap_or_default()))
}

/// Upserts one calendar day per entry and answers with the days written.
async fn post_rates(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: String,
) -> Result<(StatusCode, Json<Vec<CalendarDay>>), Failure> {
    let mut store = db.store.write().await;
    if !store.has_listing(&id) {
        return Err(failure(StatusCode::NOT_FOUND, format!("listing {id} not found")));
    }

    let updates: Vec<RateUpdate> = serde_json::from_str(&body)
        .map_err(|e| failure(StatusCode::BAD_REQUEST, format!("invalid rates batch: {e}")))?;
    if let Some(problem) = updates.iter().find_map(RateUpdate::problem) {
        return Err(failure(StatusCode::BAD_REQUEST, problem));
    }

    let calendar = store.calendars.entry(id).or_default();
    let written: Vec<CalendarDay> = updates.into_iter().map(RateUpdate::into_day).collect();
    for day in &written {
        calendar.retain(|existing| existing.date != day.date);
        calendar.push(day.clone());
    }
    calendar.sort_by_key(|day| day.date);

    Ok((StatusCode::CREATED, Json(written)))
}

#[derive(Debug, Deserialize)]
pub struct ReservationFilter {
    #[serde(rename = "checkinStartDate")]
    pub checkin_start_date: Option<NaiveDate>,
}

async fn list_reservations(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(filter): Query<ReservationFilter>,
) -> Result<Json<Vec<Reservation>>, Failure> {
    let store = db.store.read().await;
    if !store.has_listing(&id) {
        return Err(failure(StatusCode::NOT_FOUND, format!("listing {id} not found")));
    }
    let reservations = store
        .reservations
        .iter()
        .filter(|r| r.listing_id == id)
        .filter(|r| filter.checkin_start_date.map_or(true, |start| r.checkin_date >= start))
        .cloned()
        .collect();
    Ok(Json(reservations))
}

async fn get_reservation(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, Failure> {
    let store = db.store.read().await;
    store
        .reservations
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("reservation {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_serializes_with_vendor_field_names() {
        let listing = Fixtures::sample().listings.remove(0);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["id"], "lst_1001");
        assert_eq!(json["accountId"], "acc_1");
        assert_eq!(json["isListed"], true);
        assert_eq!(json["address"]["zipCode"], "1100-001");
    }

    #[test]
    fn calendar_day_serializes_date_as_iso() {
        let (_, days) = Fixtures::sample().calendars.remove(0);
        let json = serde_json::to_value(&days[0]).unwrap();
        assert_eq!(json["date"], "2026-01-01");
        assert_eq!(json["availability"], "booked");
        assert_eq!(json["minNights"], 2);
    }

    #[test]
    fn rate_update_accepts_optional_guest_fields() {
        let update: RateUpdate = serde_json::from_str(
            r#"{"date":"2026-02-01","dailyPrice":120,"minNights":2,"checkinDays":["friday"],"checkoutDays":["sunday"]}"#,
        )
        .unwrap();
        assert!(update.extra_guests.is_none());
        assert!(update.problem().is_none());
    }

    #[test]
    fn rate_update_rejects_unknown_weekday() {
        let update: RateUpdate = serde_json::from_str(
            r#"{"date":"2026-02-01","dailyPrice":120,"minNights":2,"checkinDays":["caturday"],"checkoutDays":[]}"#,
        )
        .unwrap();
        assert!(update.problem().unwrap().contains("caturday"));
    }

    #[test]
    fn rate_update_rejects_zero_min_nights() {
        let update: RateUpdate = serde_json::from_str(
            r#"{"date":"2026-02-01","dailyPrice":120,"minNights":0,"checkinDays":[],"checkoutDays":[]}"#,
        )
        .unwrap();
        assert!(update.problem().is_some());
    }

    #[test]
    fn reservation_filter_reads_vendor_query_name() {
        let filter: ReservationFilter =
            serde_json::from_str(r#"{"checkinStartDate":"2026-01-10"}"#).unwrap();
        assert_eq!(filter.checkin_start_date, NaiveDate::from_ymd_opt(2026, 1, 10));
    }
}
