//! Per-card state and the pure render pass.
//!
//! `CardState` is the one mutable record for a tracked train. The
//! driver task in `card::task` owns exactly one and funnels every
//! mutation through the methods here; `render` is a pure function of
//! the state, so every display decision can be tested without timers
//! or a runtime.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Language;
use crate::domain::{StopRecord, TrainId, Vehicle};
use crate::i18n::Catalog;
use crate::irail::FetchError;

use super::label::relative_label;

/// Card lifecycle.
///
/// Mutations while `Constructed` are buffered: they update the state
/// but trigger no refresh until the card is attached. `Disposed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Attached,
    Disposed,
}

/// A fetch failure, classified for message lookup.
///
/// Carries the HTTP status when one was received; transport and
/// malformed-data failures have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardError {
    /// Non-success HTTP status.
    Status(u16),
    /// No response reached us at all.
    Transport,
    /// A response arrived but could not be interpreted.
    Data,
}

impl CardError {
    /// Classify a client error.
    pub fn classify(err: &FetchError) -> Self {
        match err {
            FetchError::Status { status, .. } => CardError::Status(*status),
            FetchError::Transport(_) => CardError::Transport,
            FetchError::Decode { .. } | FetchError::Convert(_) => CardError::Data,
        }
    }

    /// The HTTP status code, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CardError::Status(status) => Some(*status),
            _ => None,
        }
    }

    /// Catalog keys to try in order for the user-facing message.
    ///
    /// A status-specific key first, then the generic fallback.
    pub fn message_keys(&self) -> Vec<String> {
        match self {
            CardError::Status(status) => vec![
                format!("card.error.{status}"),
                "card.error.unknown".to_string(),
            ],
            CardError::Transport => vec![
                "card.error.network".to_string(),
                "card.error.unknown".to_string(),
            ],
            CardError::Data => vec![
                "card.error.data".to_string(),
                "card.error.unknown".to_string(),
            ],
        }
    }
}

/// One stop row, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRow {
    pub station: String,
    /// `HH:MM`, empty for the first stop.
    pub arrival: String,
    /// `HH:MM`, empty for the last stop.
    pub departure: String,
    /// `+2` for two minutes late, empty when on time.
    pub arrival_delay: String,
    pub departure_delay: String,
    pub arrival_canceled: bool,
    pub departure_canceled: bool,
    /// Empty when unannounced.
    pub platform: String,
    pub platform_changed: bool,
}

impl StopRow {
    fn from_record(record: &StopRecord) -> Self {
        Self {
            station: record.station.clone(),
            arrival: record
                .scheduled_arrival
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            departure: record
                .scheduled_departure
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            arrival_delay: StopRecord::delay_cell(record.arrival_delay_mins),
            departure_delay: StopRecord::delay_cell(record.departure_delay_mins),
            arrival_canceled: record.arrival_canceled,
            departure_canceled: record.departure_canceled,
            platform: record.platform.clone().unwrap_or_default(),
            platform_changed: record.platform_changed,
        }
    }
}

/// Immutable display snapshot of one card.
///
/// Exactly one of `error`, `loading` or a (possibly empty) stop table
/// is shown; an error always suppresses the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Monotonically increasing render counter, set by the driver.
    pub revision: u64,
    pub train: String,
    pub vehicle_name: String,
    pub station: String,
    /// Localized error panel text, if the last refresh failed.
    pub error: Option<String>,
    /// True before the first successful refresh (and without an error).
    pub loading: bool,
    pub rows: Vec<StopRow>,
    /// Localized footer text; empty means the footer is hidden.
    pub update_label: String,
    pub footer_visible: bool,
}

/// The mutable state of one tracked train.
#[derive(Debug, Clone)]
pub struct CardState {
    train: TrainId,
    station: String,
    vehicle_name: Option<String>,
    stops: Vec<StopRecord>,
    last_refresh: Option<DateTime<Utc>>,
    next_event: Option<DateTime<Utc>>,
    last_error: Option<CardError>,
    lifecycle: Lifecycle,
}

impl CardState {
    /// Create a card in the `Constructed` state.
    pub fn new(train: TrainId, station: impl Into<String>) -> Self {
        Self {
            train,
            station: station.into(),
            vehicle_name: None,
            stops: Vec::new(),
            last_refresh: None,
            next_event: None,
            last_error: None,
            lifecycle: Lifecycle::Constructed,
        }
    }

    /// The tracked train.
    pub fn train(&self) -> &TrainId {
        &self.train
    }

    /// The watched station (display-only filter hint).
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Attach the card. Returns true when this transition should
    /// trigger the initial refresh (i.e. the card was `Constructed`).
    pub fn attach(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Constructed {
            self.lifecycle = Lifecycle::Attached;
            true
        } else {
            false
        }
    }

    /// Mark the card disposed. Terminal.
    pub fn dispose(&mut self) {
        self.lifecycle = Lifecycle::Disposed;
    }

    /// Replace the tracked train. Returns true when the change should
    /// trigger a refresh (only once attached; buffered before that).
    pub fn set_train(&mut self, train: TrainId) -> bool {
        self.train = train;
        self.lifecycle == Lifecycle::Attached
    }

    /// Replace the watched station. Returns true when the change should
    /// trigger a refresh.
    pub fn set_station(&mut self, station: impl Into<String>) -> bool {
        self.station = station.into();
        self.lifecycle == Lifecycle::Attached
    }

    /// Set or clear the next known schedule event.
    pub fn set_next_event(&mut self, at: Option<DateTime<Utc>>) {
        self.next_event = at;
    }

    /// Record a successful refresh: the stop list is replaced wholesale
    /// and any previous error or pending event is cleared.
    pub fn apply_success(&mut self, vehicle: Vehicle, now: DateTime<Utc>) {
        self.vehicle_name = Some(vehicle.name);
        self.stops = vehicle.stops;
        self.last_refresh = Some(now);
        self.next_event = None;
        self.last_error = None;
    }

    /// Record a failed refresh.
    pub fn apply_failure(&mut self, error: CardError) {
        self.last_error = Some(error);
    }

    /// Render the current state.
    ///
    /// Returns the view and the delay after which the footer label must
    /// be drawn again, if any. The caller owns the timer; arming it
    /// must replace the previous one.
    pub fn render(
        &self,
        now: DateTime<Utc>,
        catalog: &Catalog,
        lang: Language,
    ) -> (CardView, Option<Duration>) {
        let error = self
            .last_error
            .map(|e| catalog.t_first(lang, &e.message_keys()));

        let rows = if error.is_none() {
            self.stops.iter().map(StopRow::from_record).collect()
        } else {
            Vec::new()
        };

        let (label, redraw) = relative_label(self.last_refresh, self.next_event, now);
        let update_label = label.localize(catalog, lang);
        let footer_visible = !update_label.is_empty();

        let view = CardView {
            revision: 0,
            train: self.train.to_string(),
            vehicle_name: self.vehicle_name.clone().unwrap_or_default(),
            station: self.station.clone(),
            loading: error.is_none() && self.last_refresh.is_none(),
            error,
            rows,
            update_label,
            footer_visible,
        };

        (view, redraw)
    }
}
