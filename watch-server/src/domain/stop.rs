//! Stop records for a tracked vehicle.

use chrono::{DateTime, Utc};

/// One scheduled station visit within a vehicle's itinerary.
///
/// Delays are in signed whole minutes; zero means on time. The wire
/// format carries delays in seconds, converted in `irail::convert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecord {
    /// Station name as reported by the API.
    pub station: String,

    /// Scheduled arrival time, if this is not the first stop.
    pub scheduled_arrival: Option<DateTime<Utc>>,

    /// Scheduled departure time, if this is not the last stop.
    pub scheduled_departure: Option<DateTime<Utc>>,

    /// Arrival delay in minutes (signed; 0 = on time).
    pub arrival_delay_mins: i32,

    /// Departure delay in minutes (signed; 0 = on time).
    pub departure_delay_mins: i32,

    /// Whether the arrival at this stop is cancelled.
    pub arrival_canceled: bool,

    /// Whether the departure from this stop is cancelled.
    pub departure_canceled: bool,

    /// Platform number/letter, if announced.
    pub platform: Option<String>,

    /// Whether the platform differs from the normally scheduled one.
    pub platform_changed: bool,
}

impl StopRecord {
    /// Delay cell text for display: `+2` for two minutes late, `-1` for
    /// one minute early, empty when on time.
    pub fn delay_cell(mins: i32) -> String {
        if mins > 0 {
            format!("+{mins}")
        } else if mins < 0 {
            format!("{mins}")
        } else {
            String::new()
        }
    }
}

/// A specific train run with its full itinerary.
///
/// The stop list is replaced wholesale on every refresh, never patched
/// in place, so a render can never show rows from two different fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    /// Display name, e.g. `IC 538`.
    pub name: String,

    /// Ordered stops along the itinerary.
    pub stops: Vec<StopRecord>,
}
