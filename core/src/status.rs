//! Status-code classification.
//!
//! # Design
//! Classification runs in three layers:
//! 1. the allowed-set gate, which turns any unknown code into
//!    `UnexpectedStatus`;
//! 2. the generic rules shared by every operation;
//! 3. the operation's own rules, which replace the generic result for the
//!    codes they name.
//!
//! Each layer is a constant table of [`StatusRule`]s, so the mapping for an
//! operation can be read top to bottom without following branches.

use crate::error::ErrorKind;
use crate::routes::Route;

/// Codes the vendor API is documented to return.
pub const DEFAULT_ALLOWED_STATUSES: &[u16] = &[200, 201, 400, 401, 404, 500];

/// Maps one status code to the error kind it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub status: u16,
    pub kind: ErrorKind,
}

const fn rule(status: u16, kind: ErrorKind) -> StatusRule {
    StatusRule { status, kind }
}

/// Rules applied to every operation.
///
/// 403 only reaches this table when a caller widens the allowed set.
pub const GENERIC_RULES: &[StatusRule] = &[
    rule(500, ErrorKind::ServerError),
    rule(400, ErrorKind::BadRequest),
    rule(401, ErrorKind::InvalidCredentials),
    rule(403, ErrorKind::InvalidCredentials),
];

const LISTING_LOOKUP_RULES: &[StatusRule] = &[rule(404, ErrorKind::PropertyNotFound)];

const RESERVATION_LOOKUP_RULES: &[StatusRule] = &[rule(404, ErrorKind::ReservationNotFound)];

const POST_RATES_RULES: &[StatusRule] = &[
    rule(404, ErrorKind::PropertyNotFound),
    rule(400, ErrorKind::PostingRates),
];

/// Every call the client can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetAccount,
    GetListingIds,
    GetListing,
    GetCalendar,
    PostRates,
    GetListingReservations,
    GetReservation,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::GetAccount,
        Operation::GetListingIds,
        Operation::GetListing,
        Operation::GetCalendar,
        Operation::PostRates,
        Operation::GetListingReservations,
        Operation::GetReservation,
    ];

    pub fn route(self) -> Route {
        match self {
            Operation::GetAccount => Route::Account,
            Operation::GetListingIds => Route::Listings,
            Operation::GetListing => Route::Listing,
            Operation::GetCalendar | Operation::PostRates => Route::Calendar,
            Operation::GetListingReservations => Route::ListingReservations,
            Operation::GetReservation => Route::Reservation,
        }
    }

    /// Operation-specific rules, evaluated after [`GENERIC_RULES`] and taking
    /// precedence over them.
    pub fn rules(self) -> &'static [StatusRule] {
        match self {
            Operation::GetAccount | Operation::GetListingIds => &[],
            Operation::GetListing | Operation::GetCalendar | Operation::GetListingReservations => {
                LISTING_LOOKUP_RULES
            }
            Operation::GetReservation => RESERVATION_LOOKUP_RULES,
            Operation::PostRates => POST_RATES_RULES,
        }
    }
}

fn lookup(rules: &[StatusRule], status: u16) -> Option<ErrorKind> {
    rules.iter().find(|r| r.status == status).map(|r| r.kind)
}

/// Classify `status` for `operation`. `None` means the response is a success.
pub fn classify(operation: Operation, status: u16, allowed: &[u16]) -> Option<ErrorKind> {
    if !allowed.contains(&status) {
        return Some(ErrorKind::UnexpectedStatus);
    }
    let generic = lookup(GENERIC_RULES, status);
    lookup(operation.rules(), status).or(generic)
}
