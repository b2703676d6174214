//! Core domain types for tracked trains.

mod stop;
mod train;

pub use stop::{StopRecord, Vehicle};
pub use train::{InvalidTrainId, TrainId};
