//! Scripted vehicle source for testing without API access.
//!
//! Queues a sequence of outcomes and serves them as if they were live
//! fetch results, mimicking the `IrailClient` interface through the
//! `FetchVehicle` trait.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::domain::{StopRecord, TrainId, Vehicle};

use super::FetchVehicle;
use super::error::FetchError;

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Successful fetch with the given vehicle.
    Vehicle(Vehicle),
    /// HTTP failure with the given status code.
    Status(u16),
    /// Malformed response body.
    Decode,
}

/// Vehicle source that serves scripted outcomes in order.
///
/// An exhausted queue answers with HTTP 599 so a test that polls more
/// often than it scripted fails loudly instead of hanging.
#[derive(Debug, Clone, Default)]
pub struct MockVehicleSource {
    queue: Arc<Mutex<VecDeque<MockOutcome>>>,
}

impl MockVehicleSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch.
    pub fn push_vehicle(&self, vehicle: Vehicle) {
        self.queue
            .lock()
            .expect("mock queue poisoned")
            .push_back(MockOutcome::Vehicle(vehicle));
    }

    /// Queue an HTTP status failure.
    pub fn push_status(&self, status: u16) {
        self.queue
            .lock()
            .expect("mock queue poisoned")
            .push_back(MockOutcome::Status(status));
    }

    /// Queue a malformed-body failure.
    pub fn push_decode_failure(&self) {
        self.queue
            .lock()
            .expect("mock queue poisoned")
            .push_back(MockOutcome::Decode);
    }

    /// Number of outcomes still queued.
    pub fn remaining(&self) -> usize {
        self.queue.lock().expect("mock queue poisoned").len()
    }
}

impl FetchVehicle for MockVehicleSource {
    async fn fetch_vehicle(&self, _train: &TrainId) -> Result<Vehicle, FetchError> {
        let outcome = self
            .queue
            .lock()
            .expect("mock queue poisoned")
            .pop_front();

        match outcome {
            Some(MockOutcome::Vehicle(vehicle)) => Ok(vehicle),
            Some(MockOutcome::Status(status)) => Err(FetchError::Status {
                status,
                message: String::new(),
            }),
            Some(MockOutcome::Decode) => Err(FetchError::Decode {
                message: "mock: malformed body".into(),
            }),
            None => Err(FetchError::Status {
                status: 599,
                message: "mock queue exhausted".into(),
            }),
        }
    }
}

/// Build a vehicle with `n` synthetic stops, ten minutes apart.
pub fn vehicle_with_stops(n: usize) -> Vehicle {
    let base = Utc::now();
    let stops = (0..n)
        .map(|i| StopRecord {
            station: format!("Station {i}"),
            scheduled_arrival: (i > 0).then(|| base + Duration::minutes(10 * i as i64)),
            scheduled_departure: (i + 1 < n).then(|| base + Duration::minutes(10 * i as i64 + 1)),
            arrival_delay_mins: 0,
            departure_delay_mins: 0,
            arrival_canceled: false,
            departure_canceled: false,
            platform: Some(format!("{}", i + 1)),
            platform_changed: false,
        })
        .collect();

    Vehicle {
        name: "IC 538".into(),
        stops,
    }
}
