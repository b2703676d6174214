//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::card::{CardView, StopRow};
use crate::irail::Connection;

/// Form for creating a card.
#[derive(Debug, Deserialize)]
pub struct CreateCardForm {
    /// Train identifier, e.g. "IC 538".
    #[serde(rename = "train-number")]
    pub train_number: String,

    /// Optional watched station (display-only filter hint).
    pub station: Option<String>,
}

/// Query for looking up a vehicle's itinerary.
#[derive(Debug, Deserialize)]
pub struct VehicleQuery {
    /// Train identifier.
    pub number: String,
}

/// Query for searching connections between two stations.
#[derive(Debug, Deserialize)]
pub struct ConnectionsQuery {
    /// Departure station name.
    pub from: String,

    /// Arrival station name.
    pub to: String,

    /// "departure" (default) or "arrival".
    pub timesel: Option<String>,

    /// Time in HH:MM format (defaults to now).
    pub time: Option<String>,
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// All station names, sorted.
    pub stations: Vec<String>,
}

/// Response after creating a card.
#[derive(Debug, Serialize)]
pub struct CardCreated {
    /// Registry id of the new card.
    pub id: u64,
}

/// One card in a JSON listing.
#[derive(Debug, Serialize)]
pub struct CardResult {
    pub id: u64,
    pub train: String,
    pub vehicle_name: String,
    pub station: String,
    pub error: Option<String>,
    pub loading: bool,
    pub stops: Vec<StopResult>,
    pub update_label: String,
}

impl CardResult {
    /// Create from a published card view.
    pub fn from_view(id: u64, view: &CardView) -> Self {
        Self {
            id,
            train: view.train.clone(),
            vehicle_name: view.vehicle_name.clone(),
            station: view.station.clone(),
            error: view.error.clone(),
            loading: view.loading,
            stops: view.rows.iter().map(StopResult::from_row).collect(),
            update_label: view.update_label.clone(),
        }
    }
}

/// One stop row in a JSON card.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub station: String,
    pub arrival: String,
    pub departure: String,
    pub arrival_delay: String,
    pub departure_delay: String,
    pub arrival_canceled: bool,
    pub departure_canceled: bool,
    pub platform: String,
    pub platform_changed: bool,
}

impl StopResult {
    fn from_row(row: &StopRow) -> Self {
        Self {
            station: row.station.clone(),
            arrival: row.arrival.clone(),
            departure: row.departure.clone(),
            arrival_delay: row.arrival_delay.clone(),
            departure_delay: row.departure_delay.clone(),
            arrival_canceled: row.arrival_canceled,
            departure_canceled: row.departure_canceled,
            platform: row.platform.clone(),
            platform_changed: row.platform_changed,
        }
    }
}

/// Response for the card listing.
#[derive(Debug, Serialize)]
pub struct CardListResponse {
    pub cards: Vec<CardResult>,
}

/// A vehicle's itinerary in JSON form.
#[derive(Debug, Serialize)]
pub struct VehicleResult {
    /// Short train name, e.g. "IC 538".
    pub name: String,

    /// Stop station names, in itinerary order.
    pub stations: Vec<String>,
}

/// One connection option in JSON form.
#[derive(Debug, Serialize)]
pub struct ConnectionResult {
    /// Short name of the departing train.
    pub train: String,

    /// Departure station name.
    pub from: String,

    /// Arrival station name.
    pub to: String,

    /// Departure time, HH:MM.
    pub departure: String,

    /// Arrival time, HH:MM.
    pub arrival: String,

    /// Transfer stations, empty for a direct connection.
    pub vias: Vec<String>,
}

impl ConnectionResult {
    /// Create from a converted connection.
    pub fn from_connection(conn: &Connection) -> Self {
        Self {
            train: conn.train.clone(),
            from: conn.from_station.clone(),
            to: conn.to_station.clone(),
            departure: conn.departure.format("%H:%M").to_string(),
            arrival: conn.arrival.format("%H:%M").to_string(),
            vias: conn.vias.clone(),
        }
    }
}

/// Response for the connection search.
#[derive(Debug, Serialize)]
pub struct ConnectionsResult {
    pub connections: Vec<ConnectionResult>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
