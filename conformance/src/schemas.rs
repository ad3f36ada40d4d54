//! # Payload schemas
//!
//! JSON Schemas (Draft 2020-12) for every payload the checker inspects,
//! compiled once with format assertions turned on so `date`, `date-time`
//! and `uri` strings are actually checked.
//!
//! The schema sources live in `schemas/*.schema.json` and are embedded at
//! build time. The reservation-list schema is derived from the reservation
//! schema rather than stored separately.

use std::collections::HashMap;
use std::fmt;

use jsonschema::Validator;
use serde_json::{json, Value};
use thiserror::Error;

use crate::report::Violation;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// An embedded schema source is not valid JSON.
    #[error("schema '{schema}' is not valid JSON: {reason}")]
    InvalidJson { schema: SchemaName, reason: String },

    /// The schema parsed but could not be compiled into a validator.
    #[error("schema '{schema}' could not be compiled: {reason}")]
    Build { schema: SchemaName, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    Account,
    ListingIds,
    Listing,
    Calendar,
    Reservation,
    ReservationList,
}

impl SchemaName {
    pub const ALL: [SchemaName; 6] = [
        SchemaName::Account,
        SchemaName::ListingIds,
        SchemaName::Listing,
        SchemaName::Calendar,
        SchemaName::Reservation,
        SchemaName::ReservationList,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaName::Account => "account",
            SchemaName::ListingIds => "listing-ids",
            SchemaName::Listing => "listing",
            SchemaName::Calendar => "calendar",
            SchemaName::Reservation => "reservation",
            SchemaName::ReservationList => "reservation-list",
        }
    }

    fn source(self) -> Option<&'static str> {
        match self {
            SchemaName::Account => Some(include_str!("../schemas/account.schema.json")),
            SchemaName::ListingIds => Some(include_str!("../schemas/listing-ids.schema.json")),
            SchemaName::Listing => Some(include_str!("../schemas/listing.schema.json")),
            SchemaName::Calendar => Some(include_str!("../schemas/calendar.schema.json")),
            SchemaName::Reservation => Some(include_str!("../schemas/reservation.schema.json")),
            SchemaName::ReservationList => None,
        }
    }

    /// Parsed schema document.
    pub fn document(self) -> Result<Value, SchemaError> {
        match self.source() {
            Some(source) => {
                serde_json::from_str(source).map_err(|e| SchemaError::InvalidJson {
                    schema: self,
                    reason: e.to_string(),
                })
            }
            None => {
                let mut item = SchemaName::Reservation.document()?;
                if let Some(object) = item.as_object_mut() {
                    object.remove("$schema");
                    object.remove("title");
                }
                Ok(json!({
                    "$schema": "https://json-schema.org/draft/2020-12/schema",
                    "title": "Reservation list",
                    "type": "array",
                    "items": item,
                }))
            }
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every schema, compiled. Build once and share by reference.
pub struct SchemaSet {
    validators: HashMap<SchemaName, Validator>,
}

impl fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.validators.keys().map(|n| n.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("SchemaSet").field("schemas", &names).finish()
    }
}

impl SchemaSet {
    pub fn compile() -> Result<Self, SchemaError> {
        let mut validators = HashMap::new();
        for name in SchemaName::ALL {
            let document = name.document()?;

            let mut opts = jsonschema::options();
            opts.with_draft(jsonschema::Draft::Draft202012);
            opts.should_validate_formats(true);
            let validator = opts.build(&document).map_err(|e| SchemaError::Build {
                schema: name,
                reason: e.to_string(),
            })?;

            validators.insert(name, validator);
        }
        Ok(Self { validators })
    }

    /// Every violation of `schema` by `instance`, sorted by message then path.
    pub fn validate(&self, schema: SchemaName, instance: &Value) -> Vec<Violation> {
        let Some(validator) = self.validators.get(&schema) else {
            return vec![Violation {
                path: "$".to_string(),
                message: format!("schema '{schema}' is not loaded"),
            }];
        };

        let mut violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                path: json_path(&e.instance_path.to_string()),
                message: e.to_string(),
            })
            .collect();
        violations.sort_by(|a, b| a.message.cmp(&b.message).then_with(|| a.path.cmp(&b.path)));
        violations
    }
}

/// Render a JSON Pointer (`/address/0/street`) as a JSONPath
/// (`$.address[0].street`).
pub fn json_path(pointer: &str) -> String {
    let mut path = String::from("$");
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            path.push('.');
            path.push_str(&segment);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemas() -> SchemaSet {
        SchemaSet::compile().unwrap()
    }

    fn listing() -> Value {
        json!({
            "id": "abc123",
            "accountId": "acc_1",
            "createdAt": "2025-06-01T09:30:00Z",
            "updatedAt": "2025-11-12T17:04:55Z",
            "title": "Harbour view loft",
            "bedrooms": 2,
            "bathrooms": 1.5,
            "minNights": 2,
            "description": "Close to the water.",
            "isListed": true,
            "currency": "EUR",
            "checkinDays": ["friday", "saturday"],
            "checkoutDays": ["sunday"],
            "roomType": "entire_home",
            "address": {
                "street": "1 Quay Street",
                "city": "Lisbon",
                "state": "",
                "country": "PT",
                "zipCode": "1100-001",
                "latitude": "38.7077",
                "longitude": "-9.1365"
            }
        })
    }

    #[test]
    fn every_schema_compiles() {
        let set = schemas();
        for name in SchemaName::ALL {
            assert!(set.validators.contains_key(&name), "{name}");
        }
    }

    #[test]
    fn well_formed_listing_has_no_violations() {
        assert!(schemas().validate(SchemaName::Listing, &listing()).is_empty());
    }

    #[test]
    fn missing_bedrooms_is_one_violation() {
        let mut payload = listing();
        payload.as_object_mut().unwrap().remove("bedrooms");

        let violations = schemas().validate(SchemaName::Listing, &payload);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].path, "$");
        assert!(violations[0].message.contains("bedrooms"));
    }

    #[test]
    fn nested_violation_reports_field_path() {
        let mut payload = listing();
        payload["address"]["zipCode"] = json!("");

        let violations = schemas().validate(SchemaName::Listing, &payload);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].path, "$.address.zipCode");
    }

    #[test]
    fn formats_are_asserted() {
        let mut payload = listing();
        payload["createdAt"] = json!("yesterday");
        let violations = schemas().validate(SchemaName::Listing, &payload);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].path, "$.createdAt");

        let calendar = json!([{
            "date": "2026-13-45",
            "dailyPrice": 100,
            "availability": "available",
            "minNights": 1,
            "checkinDays": [],
            "checkoutDays": []
        }]);
        let violations = schemas().validate(SchemaName::Calendar, &calendar);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].path, "$[0].date");
    }

    #[test]
    fn image_url_may_be_a_uri() {
        let mut payload = listing();
        payload["imageUrl"] = json!("https://img.example.test/1.jpg");
        assert!(schemas().validate(SchemaName::Listing, &payload).is_empty());
    }

    #[test]
    fn all_violations_are_collected_and_sorted() {
        let mut payload = listing();
        let object = payload.as_object_mut().unwrap();
        object.remove("title");
        object.remove("bedrooms");
        object.insert("checkinDays".to_string(), json!(["someday"]));

        let violations = schemas().validate(SchemaName::Listing, &payload);
        assert_eq!(violations.len(), 3, "{violations:?}");
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        let mut sorted = messages.clone();
        sorted.sort();
        assert_eq!(messages, sorted);
    }

    #[test]
    fn repeated_weekdays_are_accepted() {
        let set = schemas();
        let mut payload = listing();
        payload["checkinDays"] = json!(["friday", "friday"]);
        assert!(set.validate(SchemaName::Listing, &payload).is_empty());

        let calendar = json!([{
            "date": "2026-01-01",
            "dailyPrice": 100,
            "availability": "available",
            "minNights": 1,
            "checkinDays": ["saturday", "saturday"],
            "checkoutDays": []
        }]);
        assert!(set.validate(SchemaName::Calendar, &calendar).is_empty());
    }

    #[test]
    fn listing_ids_must_be_unique_strings() {
        let set = schemas();
        assert!(set.validate(SchemaName::ListingIds, &json!(["abc123"])).is_empty());
        assert_eq!(set.validate(SchemaName::ListingIds, &json!(["a", "a"])).len(), 1);
        assert_eq!(set.validate(SchemaName::ListingIds, &json!([""])).len(), 1);
    }

    #[test]
    fn reservation_list_checks_each_item() {
        let reservation = json!({
            "id": "res_1",
            "listingId": "abc123",
            "status": "confirmed",
            "checkinDate": "2026-01-01",
            "checkoutDate": "2026-01-04",
            "guests": 2,
            "totalPrice": 570,
            "currency": "EUR"
        });
        let set = schemas();
        assert!(set.validate(SchemaName::Reservation, &reservation).is_empty());
        assert!(set
            .validate(SchemaName::ReservationList, &json!([reservation.clone()]))
            .is_empty());

        let mut broken = reservation;
        broken["status"] = json!("maybe");
        let violations = set.validate(SchemaName::ReservationList, &json!([broken]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "$[0].status");
    }

    #[test]
    fn json_path_rendering() {
        assert_eq!(json_path(""), "$");
        assert_eq!(json_path("/address/street"), "$.address.street");
        assert_eq!(json_path("/0/date"), "$[0].date");
        assert_eq!(json_path("/a~1b/c~0d"), "$.a/b.c~d");
    }
}
