//! Conversion from iRail wire DTOs to domain types.
//!
//! The iRail JSON format encodes timestamps as epoch-second strings,
//! delays as second counts and booleans as `"1"`/`"0"`. Everything the
//! rest of the crate sees goes through this module, so a malformed
//! response surfaces as a `ConvertError` rather than a panic or a
//! silently wrong row.

use chrono::{DateTime, Utc};

use crate::domain::{StopRecord, Vehicle};

use super::types::{ConnectionDto, StopDto, VehicleResponse};

/// Errors interpreting decoded iRail values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// A field that should hold an epoch-seconds timestamp did not.
    #[error("invalid timestamp in {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// A numeric field did not parse.
    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// A connection option, converted for display and card creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Short name of the departing train, e.g. `IC 1832`.
    pub train: String,

    /// Departure station name.
    pub from_station: String,

    /// Arrival station name.
    pub to_station: String,

    /// Departure instant.
    pub departure: DateTime<Utc>,

    /// Arrival instant.
    pub arrival: DateTime<Utc>,

    /// Transfer stations, empty for a direct connection.
    pub vias: Vec<String>,
}

/// Convert a `/vehicle/` response into a domain `Vehicle`.
///
/// Stop order is preserved exactly; the stop list replaces whatever the
/// caller held before.
pub fn convert_vehicle(raw: &VehicleResponse) -> Result<Vehicle, ConvertError> {
    let name = raw
        .vehicleinfo
        .as_ref()
        .and_then(|info| info.shortname.clone())
        .unwrap_or_else(|| raw.vehicle.clone());

    let stops = raw
        .stops
        .stop
        .iter()
        .map(convert_stop)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Vehicle { name, stops })
}

/// Convert one raw stop row.
fn convert_stop(raw: &StopDto) -> Result<StopRecord, ConvertError> {
    let platform_changed = raw
        .platform_info
        .as_ref()
        .and_then(|info| info.normal.as_deref())
        .is_some_and(|normal| normal == "0");

    // "?" is iRail's placeholder for an unannounced platform
    let platform = raw
        .platform
        .as_deref()
        .filter(|p| !p.is_empty() && *p != "?")
        .map(str::to_string);

    Ok(StopRecord {
        station: raw.station.clone(),
        scheduled_arrival: parse_epoch_opt("scheduledArrivalTime", raw.scheduled_arrival_time.as_deref())?,
        scheduled_departure: parse_epoch_opt(
            "scheduledDepartureTime",
            raw.scheduled_departure_time.as_deref(),
        )?,
        arrival_delay_mins: parse_delay_mins("arrivalDelay", raw.arrival_delay.as_deref())?,
        departure_delay_mins: parse_delay_mins("departureDelay", raw.departure_delay.as_deref())?,
        arrival_canceled: parse_flag(raw.arrival_canceled.as_deref()),
        departure_canceled: parse_flag(raw.departure_canceled.as_deref()),
        platform,
        platform_changed,
    })
}

/// Convert a `/connections/` entry.
pub fn convert_connection(raw: &ConnectionDto) -> Result<Connection, ConvertError> {
    let train = raw
        .departure
        .vehicleinfo
        .as_ref()
        .and_then(|info| info.shortname.clone())
        .unwrap_or_default();

    let vias = raw
        .vias
        .as_ref()
        .and_then(|v| v.via.as_ref())
        .map(|via| via.iter().map(|v| v.station.clone()).collect())
        .unwrap_or_default();

    Ok(Connection {
        train,
        from_station: raw.departure.station.clone(),
        to_station: raw.arrival.station.clone(),
        departure: parse_epoch("departure.time", &raw.departure.time)?,
        arrival: parse_epoch("arrival.time", &raw.arrival.time)?,
        vias,
    })
}

fn parse_epoch(field: &'static str, value: &str) -> Result<DateTime<Utc>, ConvertError> {
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| ConvertError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })?;

    DateTime::from_timestamp(secs, 0).ok_or_else(|| ConvertError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn parse_epoch_opt(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ConvertError> {
    value.map(|v| parse_epoch(field, v)).transpose()
}

/// Parse a raw delay (seconds, signed) into whole minutes.
///
/// An absent delay means on time. Division truncates toward zero, so
/// a 90-second delay displays as one minute.
fn parse_delay_mins(field: &'static str, value: Option<&str>) -> Result<i32, ConvertError> {
    let Some(value) = value else {
        return Ok(0);
    };

    let secs: i32 = value
        .trim()
        .parse()
        .map_err(|_| ConvertError::InvalidNumber {
            field,
            value: value.to_string(),
        })?;

    Ok(secs / 60)
}

/// Parse a `"1"`/`"0"` flag. Anything but `"1"` is false.
fn parse_flag(value: Option<&str>) -> bool {
    value == Some("1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irail::types::{PlatformInfoDto, StopsDto, VehicleInfoDto};

    fn raw_stop(station: &str) -> StopDto {
        StopDto {
            station: station.to_string(),
            scheduled_arrival_time: Some("1700002400".into()),
            scheduled_departure_time: Some("1700002500".into()),
            arrival_delay: Some("120".into()),
            departure_delay: Some("60".into()),
            arrival_canceled: Some("0".into()),
            departure_canceled: Some("0".into()),
            platform: Some("4".into()),
            platform_info: Some(PlatformInfoDto {
                name: Some("4".into()),
                normal: Some("1".into()),
            }),
        }
    }

    fn raw_vehicle(stops: Vec<StopDto>) -> VehicleResponse {
        VehicleResponse {
            vehicle: "BE.NMBS.IC538".into(),
            vehicleinfo: Some(VehicleInfoDto {
                name: Some("BE.NMBS.IC538".into()),
                shortname: Some("IC 538".into()),
            }),
            stops: StopsDto { stop: stops },
        }
    }

    #[test]
    fn vehicle_keeps_stop_count_and_order() {
        let raw = raw_vehicle(vec![raw_stop("A"), raw_stop("B"), raw_stop("C")]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert_eq!(vehicle.name, "IC 538");
        assert_eq!(vehicle.stops.len(), 3);
        let names: Vec<&str> = vehicle.stops.iter().map(|s| s.station.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn delays_divided_by_sixty() {
        let raw = raw_vehicle(vec![raw_stop("A")]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert_eq!(vehicle.stops[0].arrival_delay_mins, 2);
        assert_eq!(vehicle.stops[0].departure_delay_mins, 1);
    }

    #[test]
    fn negative_delay_stays_signed() {
        let mut stop = raw_stop("A");
        stop.arrival_delay = Some("-120".into());
        let raw = raw_vehicle(vec![stop]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert_eq!(vehicle.stops[0].arrival_delay_mins, -2);
    }

    #[test]
    fn missing_delay_is_on_time() {
        let mut stop = raw_stop("A");
        stop.arrival_delay = None;
        let raw = raw_vehicle(vec![stop]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert_eq!(vehicle.stops[0].arrival_delay_mins, 0);
    }

    #[test]
    fn cancellation_flags() {
        let mut stop = raw_stop("A");
        stop.arrival_canceled = Some("1".into());
        stop.departure_canceled = Some("0".into());
        let raw = raw_vehicle(vec![stop]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert!(vehicle.stops[0].arrival_canceled);
        assert!(!vehicle.stops[0].departure_canceled);
    }

    #[test]
    fn platform_change_detected() {
        let mut stop = raw_stop("A");
        stop.platform_info = Some(PlatformInfoDto {
            name: Some("7".into()),
            normal: Some("0".into()),
        });
        stop.platform = Some("7".into());
        let raw = raw_vehicle(vec![stop]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert!(vehicle.stops[0].platform_changed);
        assert_eq!(vehicle.stops[0].platform.as_deref(), Some("7"));
    }

    #[test]
    fn unknown_platform_is_none() {
        let mut stop = raw_stop("A");
        stop.platform = Some("?".into());
        let raw = raw_vehicle(vec![stop]);

        let vehicle = convert_vehicle(&raw).unwrap();
        assert_eq!(vehicle.stops[0].platform, None);
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let mut stop = raw_stop("A");
        stop.scheduled_arrival_time = Some("not-a-number".into());
        let raw = raw_vehicle(vec![stop]);

        assert!(convert_vehicle(&raw).is_err());
    }

    #[test]
    fn bad_delay_is_an_error() {
        let mut stop = raw_stop("A");
        stop.departure_delay = Some("soon".into());
        let raw = raw_vehicle(vec![stop]);

        assert!(convert_vehicle(&raw).is_err());
    }

    #[test]
    fn vehicle_name_falls_back_to_id() {
        let mut raw = raw_vehicle(vec![raw_stop("A")]);
        raw.vehicleinfo = None;

        let vehicle = convert_vehicle(&raw).unwrap();
        assert_eq!(vehicle.name, "BE.NMBS.IC538");
    }
}
