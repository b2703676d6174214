//! iRail API client.
//!
//! This module wraps the public iRail schedule API
//! (<https://api.irail.be>), which serves Belgian rail data without
//! authentication.
//!
//! Key characteristics of iRail:
//! - `format=json` and `lang=<language>` are appended to every call
//! - numeric values arrive as strings: timestamps are epoch seconds,
//!   delays are seconds, flags are `"1"`/`"0"`
//! - vehicle ids are carrier-qualified (`BE.NMBS.IC538`)

mod client;
mod convert;
mod error;
pub mod mock;
mod types;

use std::future::Future;

use crate::domain::{TrainId, Vehicle};

pub use client::{IrailClient, IrailConfig};
pub use convert::{Connection, ConvertError};
pub use error::FetchError;
pub use types::TimeSelector;

/// Source of live vehicle data for a train-watch card.
///
/// The live client and the scripted mock both implement this, so the
/// card task can be driven by either.
pub trait FetchVehicle: Send + Sync + 'static {
    /// Fetch the current itinerary for the given train.
    fn fetch_vehicle(
        &self,
        train: &TrainId,
    ) -> impl Future<Output = Result<Vehicle, FetchError>> + Send;
}
