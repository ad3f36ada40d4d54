//! Route templates for the vendor API.
//!
//! Templates carry `{name}` placeholders that are substituted textually at
//! request-build time. A placeholder left unfilled is an error, never an
//! empty path segment.

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Account,
    Listings,
    Listing,
    Calendar,
    ListingReservations,
    Reservation,
}

impl Route {
    pub fn template(self) -> &'static str {
        match self {
            Route::Account => "/account",
            Route::Listings => "/listings",
            Route::Listing => "/listings/{listing_id}",
            Route::Calendar => "/listings/{listing_id}/calendar",
            Route::ListingReservations => "/listings/{listing_id}/reservations",
            Route::Reservation => "/reservations/{reservation_id}",
        }
    }

    /// Substitute every `{name}` placeholder with the matching value from
    /// `params`. Extra params are ignored.
    pub fn render(self, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let template = self.template();
        let mut path = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').unwrap_or(after.len());
            let name = &after[..close];
            let value = params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| ApiError::MissingPathParameter {
                    template,
                    parameter: name.to_string(),
                })?;
            path.push_str(value);
            rest = after.get(close + 1..).unwrap_or("");
        }
        path.push_str(rest);

        Ok(path)
    }
}
