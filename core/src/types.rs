//! Request payloads sent to the vendor API.
//!
//! Responses are handed back as `serde_json::Value` because the validator
//! checks their shape against a schema; only outgoing data is typed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day of week as spelled by the vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// One day of pricing and stay restrictions posted to a listing calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub date: NaiveDate,
    pub daily_price: f64,
    pub min_nights: u32,
    pub checkin_days: Vec<Weekday>,
    pub checkout_days: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_guest_fee: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_entry_uses_vendor_field_names() {
        let entry = RateEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            daily_price: 296.0,
            min_nights: 3,
            checkin_days: vec![Weekday::Saturday, Weekday::Friday],
            checkout_days: vec![Weekday::Saturday],
            extra_guests: None,
            extra_guest_fee: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2026-03-14");
        assert_eq!(json["dailyPrice"], 296.0);
        assert_eq!(json["minNights"], 3);
        assert_eq!(json["checkinDays"], serde_json::json!(["saturday", "friday"]));
        assert!(json.get("extraGuests").is_none());
        assert!(json.get("extraGuestFee").is_none());
    }

    #[test]
    fn extra_guest_fields_are_sent_when_present() {
        let entry = RateEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            daily_price: 433.0,
            min_nights: 2,
            checkin_days: vec![Weekday::Saturday],
            checkout_days: vec![Weekday::Saturday],
            extra_guests: Some(2),
            extra_guest_fee: Some(156.0),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["extraGuests"], 2);
        assert_eq!(json["extraGuestFee"], 156.0);
    }

    #[test]
    fn rate_entry_rejects_unknown_weekday() {
        let raw = r#"{"date":"2026-03-14","dailyPrice":1,"minNights":1,"checkinDays":["funday"],"checkoutDays":[]}"#;
        assert!(serde_json::from_str::<RateEntry>(raw).is_err());
    }
}
