use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub account_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub title: String,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub min_nights: u32,
    pub image_url: String,
    pub images: Vec<String>,
    pub description: String,
    pub is_listed: bool,
    pub currency: String,
    pub checkin_days: Vec<String>,
    pub checkout_days: Vec<String>,
    pub room_type: String,
    pub address: Address,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub daily_price: f64,
    pub availability: String,
    pub min_nights: u32,
    pub checkin_days: Vec<String>,
    pub checkout_days: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub listing_id: String,
    pub status: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub guest_name: String,
    pub guests: u32,
    pub total_price: f64,
    pub currency: String,
    pub created_at: String,
}

/// One entry of a `POST /listings/{id}/calendar` batch.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdate {
    pub date: NaiveDate,
    pub daily_price: f64,
    pub min_nights: u32,
    pub checkin_days: Vec<String>,
    pub checkout_days: Vec<String>,
    #[serde(default)]
    pub extra_guests: Option<u32>,
    #[serde(default)]
    pub extra_guest_fee: Option<f64>,
}

impl RateUpdate {
    /// Reason the entry would be refused, if any.
    pub fn problem(&self) -> Option<String> {
        if self.daily_price < 0.0 {
            return Some(format!("{}: dailyPrice must not be negative", self.date));
        }
        if self.min_nights == 0 {
            return Some(format!("{}: minNights must be at least 1", self.date));
        }
        let unknown = self
            .checkin_days
            .iter()
            .chain(&self.checkout_days)
            .find(|day| !WEEKDAYS.contains(&day.as_str()));
        if let Some(day) = unknown {
            return Some(format!("{}: unknown weekday '{day}'", self.date));
        }
        if self.extra_guest_fee.is_some() && self.extra_guests.is_none() {
            return Some(format!("{}: extraGuestFee requires extraGuests", self.date));
        }
        None
    }

    pub fn into_day(self) -> CalendarDay {
        CalendarDay {
            date: self.date,
            daily_price: self.daily_price,
            availability: "available".to_string(),
            min_nights: self.min_nights,
            checkin_days: self.checkin_days,
            checkout_days: self.checkout_days,
        }
    }
}

/// Seed data served by the mock API.
#[derive(Clone, Debug)]
pub struct Fixtures {
    pub account: Account,
    pub listings: Vec<Listing>,
    pub calendars: Vec<(String, Vec<CalendarDay>)>,
    pub reservations: Vec<Reservation>,
}

impl Fixtures {
    /// An account with nothing listed.
    pub fn empty() -> Self {
        Self {
            account: Account {
                id: "acc_1".to_string(),
                name: "Seaside Rentals".to_string(),
            },
            listings: Vec::new(),
            calendars: Vec::new(),
            reservations: Vec::new(),
        }
    }

    /// Two listings; the first has a calendar and two reservations.
    pub fn sample() -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();
        let mut fixtures = Self::empty();

        fixtures.listings = vec![
            listing("lst_1001", "Harbour view loft", 2, "https://img.example.test/1001.jpg"),
            listing("lst_1002", "Garden cottage", 1, "https://img.example.test/1002.jpg"),
        ];

        let days = (0..14)
            .map(|offset| CalendarDay {
                date: start + Duration::days(offset),
                daily_price: 180.0 + (offset as f64) * 5.0,
                availability: if offset < 3 { "booked" } else { "available" }.to_string(),
                min_nights: 2,
                checkin_days: vec!["friday".to_string(), "saturday".to_string()],
                checkout_days: vec!["sunday".to_string()],
            })
            .collect();
        fixtures.calendars = vec![("lst_1001".to_string(), days), ("lst_1002".to_string(), Vec::new())];

        fixtures.reservations = vec![
            reservation("res_5001", start, 3, "Ada Lovelace"),
            reservation("res_5002", start + Duration::days(20), 4, "Alan Turing"),
        ];
        fixtures
    }
}

fn listing(id: &str, title: &str, bedrooms: u32, image_url: &str) -> Listing {
    Listing {
        id: id.to_string(),
        account_id: "acc_1".to_string(),
        created_at: "2025-06-01T09:30:00Z".to_string(),
        updated_at: "2025-11-12T17:04:55Z".to_string(),
        title: title.to_string(),
        bedrooms,
        bathrooms: 1.5,
        min_nights: 2,
        image_url: image_url.to_string(),
        images: vec![format!("https://img.example.test/{id}/1.jpg")],
        description: format!("{title}, close to the water."),
        is_listed: true,
        currency: "EUR".to_string(),
        checkin_days: vec!["friday".to_string(), "saturday".to_string()],
        checkout_days: vec!["sunday".to_string()],
        room_type: "entire_home".to_string(),
        address: Address {
            street: "1 Quay Street".to_string(),
            city: "Lisbon".to_string(),
            state: String::new(),
            country: "PT".to_string(),
            zip_code: "1100-001".to_string(),
            latitude: "38.7077".to_string(),
            longitude: "-9.1365".to_string(),
        },
    }
}

fn reservation(id: &str, checkin: NaiveDate, nights: i64, guest: &str) -> Reservation {
    Reservation {
        id: id.to_string(),
        listing_id: "lst_1001".to_string(),
        status: "confirmed".to_string(),
        checkin_date: checkin,
        checkout_date: checkin + Duration::days(nights),
        guest_name: guest.to_string(),
        guests: 2,
        total_price: 190.0 * nights as f64,
        currency: "EUR".to_string(),
        created_at: "2025-12-01T12:00:00Z".to_string(),
    }
}
