//! Train-watch card lifecycle.
//!
//! A card tracks one train: it periodically fetches the live itinerary,
//! derives a "time until next update" footer, and renders stop rows
//! with delay, cancellation and platform annotations, recovering
//! gracefully from fetch failures.
//!
//! The split mirrors how the card behaves:
//! - `state`: the mutable record and the pure render pass
//! - `label`: the tiered relative-time footer
//! - `task`: the tokio driver owning the timers and the fetch cycle

mod label;
mod state;
mod task;

pub use label::{Label, Unit, relative_label};
pub use state::{CardError, CardState, CardView, Lifecycle, StopRow};
pub use task::{CardConfig, CardHandle};
