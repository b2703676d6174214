//! iRail API response DTOs.
//!
//! These types map directly to the iRail JSON responses (`format=json`).
//! The API encodes nearly everything as strings, including timestamps
//! (epoch seconds), delays (seconds) and boolean flags (`"1"`/`"0"`),
//! so the fields here are string-typed and parsed in `convert`.

use serde::Deserialize;

/// Response from `/stations/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsResponse {
    /// All known stations.
    pub station: Vec<StationDto>,
}

/// One station entry. We only need the display name.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub name: String,
}

/// Response from `/vehicle/`.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleResponse {
    /// Carrier-qualified vehicle id, e.g. `BE.NMBS.IC538`.
    pub vehicle: String,

    /// Vehicle naming details.
    pub vehicleinfo: Option<VehicleInfoDto>,

    /// The itinerary.
    pub stops: StopsDto,
}

/// Vehicle naming details.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleInfoDto {
    /// Full name, e.g. `BE.NMBS.IC538`.
    pub name: Option<String>,

    /// Short display name, e.g. `IC 538`.
    pub shortname: Option<String>,
}

/// Wrapper around the stop list.
#[derive(Debug, Clone, Deserialize)]
pub struct StopsDto {
    /// Stop rows, in itinerary order.
    pub stop: Vec<StopDto>,
}

/// One raw stop row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    /// Station name.
    pub station: String,

    /// Scheduled arrival, epoch seconds. Absent on the first stop.
    pub scheduled_arrival_time: Option<String>,

    /// Scheduled departure, epoch seconds. Absent on the last stop.
    pub scheduled_departure_time: Option<String>,

    /// Arrival delay in seconds (signed).
    pub arrival_delay: Option<String>,

    /// Departure delay in seconds (signed).
    pub departure_delay: Option<String>,

    /// `"1"` when the arrival is cancelled.
    pub arrival_canceled: Option<String>,

    /// `"1"` when the departure is cancelled.
    pub departure_canceled: Option<String>,

    /// Platform number/letter. `"?"` when unknown.
    pub platform: Option<String>,

    /// Platform details; `normal == "0"` means the platform changed.
    #[serde(rename = "platforminfo")]
    pub platform_info: Option<PlatformInfoDto>,
}

/// Platform details for a stop.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformInfoDto {
    pub name: Option<String>,

    /// `"1"` when this is the normally scheduled platform.
    pub normal: Option<String>,
}

/// Response from `/connections/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsResponse {
    /// Journey options, best first.
    pub connection: Vec<ConnectionDto>,
}

/// One journey option between two stations.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionDto {
    pub departure: ConnectionEndpointDto,
    pub arrival: ConnectionEndpointDto,
    pub vias: Option<ViasDto>,
}

/// Departure or arrival half of a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionEndpointDto {
    /// Station name.
    pub station: String,

    /// Epoch seconds.
    pub time: String,

    /// Vehicle naming details for this leg.
    pub vehicleinfo: Option<VehicleInfoDto>,
}

/// Intermediate transfers of a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ViasDto {
    /// Number of transfers, as a string.
    pub number: Option<String>,

    pub via: Option<Vec<ViaDto>>,
}

/// One intermediate transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct ViaDto {
    /// Transfer station name.
    pub station: String,
}

/// Whether the requested time is a departure or an arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSelector {
    #[default]
    Departure,
    Arrival,
}

impl TimeSelector {
    /// Query-parameter value for the `timesel` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSelector::Departure => "departure",
            TimeSelector::Arrival => "arrival",
        }
    }

    /// Parse from a form value. Anything other than `arrival` is a
    /// departure search, matching the API's own default.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("arrival") {
            TimeSelector::Arrival
        } else {
            TimeSelector::Departure
        }
    }
}
