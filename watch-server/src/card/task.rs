//! Card driver task.
//!
//! Each card is one tokio task owning its `CardState` and both of its
//! timers. The task reacts to commands (attribute changes, forced
//! refresh, disposal), to fetch completions, and to its own timers:
//!
//! - the refresh timer schedules the next data fetch; starting a
//!   refresh disarms it, and a completed refresh re-arms it
//! - the render timer redraws the relative-time footer at the cadence
//!   chosen by the label tier; every publish re-arms it, replacing the
//!   previous deadline
//!
//! In-flight fetches carry a generation token. Every refresh bumps the
//! card's generation, and a completion is discarded unless its token is
//! still current, so a superseded fetch can never overwrite the state
//! of a newer one no matter how the responses are ordered.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::Language;
use crate::domain::{TrainId, Vehicle};
use crate::i18n::Catalog;
use crate::irail::{FetchError, FetchVehicle};

use super::state::{CardError, CardState, CardView};

/// Default interval between self-scheduled refreshes.
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Commands a card accepts from the outside.
#[derive(Debug)]
enum Command {
    SetTrain(TrainId),
    SetStation(String),
    SetNextEvent(Option<DateTime<Utc>>),
    Refresh,
    Dispose,
}

/// Configuration for a card driver.
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Interval between self-scheduled refreshes.
    pub refresh_interval: Duration,
}

impl CardConfig {
    /// Set a custom refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Handle to a spawned card.
///
/// Cheap to clone; dropping every handle does not stop the card, only
/// `dispose` does (the web layer removes the card from its registry at
/// the same time).
#[derive(Debug, Clone)]
pub struct CardHandle {
    cmd: mpsc::Sender<Command>,
    view: watch::Receiver<CardView>,
}

impl CardHandle {
    /// Spawn a card for the given train and station.
    ///
    /// The card attaches immediately: it publishes a loading view and
    /// starts its first refresh before the handle is returned.
    pub fn spawn<S>(
        source: S,
        catalog: Arc<Catalog>,
        lang: Language,
        config: CardConfig,
        train: TrainId,
        station: impl Into<String>,
    ) -> Self
    where
        S: FetchVehicle + Clone,
    {
        let state = CardState::new(train, station);
        let (initial, _) = state.render(Utc::now(), &catalog, lang);

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (view_tx, view_rx) = watch::channel(initial);

        tokio::spawn(run(state, source, catalog, lang, config, cmd_rx, view_tx));

        Self {
            cmd: cmd_tx,
            view: view_rx,
        }
    }

    /// Latest published view.
    pub fn view(&self) -> CardView {
        self.view.borrow().clone()
    }

    /// Subscribe to view updates.
    pub fn subscribe(&self) -> watch::Receiver<CardView> {
        self.view.clone()
    }

    /// Replace the tracked train; triggers a refresh.
    pub async fn set_train(&self, train: TrainId) {
        let _ = self.cmd.send(Command::SetTrain(train)).await;
    }

    /// Replace the watched station; triggers a refresh.
    pub async fn set_station(&self, station: impl Into<String>) {
        let _ = self.cmd.send(Command::SetStation(station.into())).await;
    }

    /// Set or clear the next known schedule event.
    pub async fn set_next_event(&self, at: Option<DateTime<Utc>>) {
        let _ = self.cmd.send(Command::SetNextEvent(at)).await;
    }

    /// Force an immediate refresh.
    pub async fn refresh(&self) {
        let _ = self.cmd.send(Command::Refresh).await;
    }

    /// Dispose the card, cancelling all of its timers.
    pub async fn dispose(&self) {
        let _ = self.cmd.send(Command::Dispose).await;
    }
}

/// Sleep until the deadline, or forever when there is none.
///
/// Only polled behind an `is_some` guard in the select below.
async fn maybe_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Start a fetch for the current train, superseding any in-flight one.
///
/// Bumps the generation and disarms the refresh timer; the completion
/// re-arms it.
fn start_refresh<S>(
    generation: &mut u64,
    refresh_deadline: &mut Option<Instant>,
    source: &S,
    train: TrainId,
    done_tx: &mpsc::Sender<(u64, Result<Vehicle, FetchError>)>,
) where
    S: FetchVehicle + Clone,
{
    *generation += 1;
    *refresh_deadline = None;

    let current = *generation;
    let source = source.clone();
    let done_tx = done_tx.clone();

    debug!(train = %train, generation = current, "starting refresh");

    tokio::spawn(async move {
        let result = source.fetch_vehicle(&train).await;
        let _ = done_tx.send((current, result)).await;
    });
}

/// Render the state and publish the view.
///
/// Re-arms the render timer from the label tier, replacing whatever
/// deadline was armed before; there is never more than one pending
/// render timer.
fn publish(
    state: &CardState,
    catalog: &Catalog,
    lang: Language,
    revision: &mut u64,
    view_tx: &watch::Sender<CardView>,
    render_deadline: &mut Option<Instant>,
) {
    let (mut view, redraw) = state.render(Utc::now(), catalog, lang);
    *revision += 1;
    view.revision = *revision;

    let _ = view_tx.send(view);
    *render_deadline = redraw.map(|delay| Instant::now() + delay);
}

/// The card's event loop.
async fn run<S>(
    mut state: CardState,
    source: S,
    catalog: Arc<Catalog>,
    lang: Language,
    config: CardConfig,
    mut cmd_rx: mpsc::Receiver<Command>,
    view_tx: watch::Sender<CardView>,
) where
    S: FetchVehicle + Clone,
{
    let (done_tx, mut done_rx) = mpsc::channel::<(u64, Result<Vehicle, FetchError>)>(8);

    let mut generation: u64 = 0;
    let mut revision: u64 = 0;
    let mut refresh_deadline: Option<Instant> = None;
    let mut render_deadline: Option<Instant> = None;

    if state.attach() {
        start_refresh(
            &mut generation,
            &mut refresh_deadline,
            &source,
            state.train().clone(),
            &done_tx,
        );
    }
    publish(
        &state,
        &catalog,
        lang,
        &mut revision,
        &view_tx,
        &mut render_deadline,
    );

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::SetTrain(train)) => {
                    if state.set_train(train) {
                        start_refresh(
                            &mut generation,
                            &mut refresh_deadline,
                            &source,
                            state.train().clone(),
                            &done_tx,
                        );
                    }
                }
                Some(Command::SetStation(station)) => {
                    if state.set_station(station) {
                        start_refresh(
                            &mut generation,
                            &mut refresh_deadline,
                            &source,
                            state.train().clone(),
                            &done_tx,
                        );
                    }
                }
                Some(Command::SetNextEvent(at)) => {
                    state.set_next_event(at);
                    publish(
                        &state,
                        &catalog,
                        lang,
                        &mut revision,
                        &view_tx,
                        &mut render_deadline,
                    );
                }
                Some(Command::Refresh) => {
                    start_refresh(
                        &mut generation,
                        &mut refresh_deadline,
                        &source,
                        state.train().clone(),
                        &done_tx,
                    );
                }
                Some(Command::Dispose) | None => break,
            },

            Some((token, result)) = done_rx.recv() => {
                if token != generation {
                    trace!(
                        train = %state.train(),
                        token,
                        generation,
                        "discarding stale fetch completion"
                    );
                    continue;
                }

                match result {
                    Ok(vehicle) => {
                        debug!(
                            train = %state.train(),
                            stops = vehicle.stops.len(),
                            "refresh succeeded"
                        );
                        state.apply_success(vehicle, Utc::now());
                    }
                    Err(err) => {
                        warn!(train = %state.train(), error = %err, "refresh failed");
                        state.apply_failure(CardError::classify(&err));
                    }
                }

                refresh_deadline = Some(Instant::now() + config.refresh_interval);
                publish(
                    &state,
                    &catalog,
                    lang,
                    &mut revision,
                    &view_tx,
                    &mut render_deadline,
                );
            }

            _ = maybe_sleep(refresh_deadline), if refresh_deadline.is_some() => {
                start_refresh(
                    &mut generation,
                    &mut refresh_deadline,
                    &source,
                    state.train().clone(),
                    &done_tx,
                );
            }

            _ = maybe_sleep(render_deadline), if render_deadline.is_some() => {
                publish(
                    &state,
                    &catalog,
                    lang,
                    &mut revision,
                    &view_tx,
                    &mut render_deadline,
                );
            }
        }
    }

    state.dispose();
    debug!(train = %state.train(), "card disposed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irail::mock::{MockVehicleSource, vehicle_with_stops};

    fn train() -> TrainId {
        TrainId::parse("IC 538").unwrap()
    }

    fn spawn_card(source: &MockVehicleSource) -> CardHandle {
        CardHandle::spawn(
            source.clone(),
            Arc::new(Catalog::builtin()),
            Language::En,
            CardConfig::default(),
            train(),
            "Leuven",
        )
    }

    /// Let all runnable tasks make progress without advancing the clock.
    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn initial_refresh_renders_exactly_once() {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(3));

        let handle = spawn_card(&source);
        settle().await;

        // revision 1 is the attach (loading) render, revision 2 the
        // fetch completion; nothing else may have rendered
        let view = handle.view();
        assert_eq!(view.revision, 2);
        assert_eq!(view.rows.len(), 3);
        assert!(!view.loading);
        assert!(view.error.is_none());
        assert!(view.footer_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_renders_exactly_once() {
        let source = MockVehicleSource::new();
        source.push_status(404);

        let handle = spawn_card(&source);
        settle().await;

        let view = handle.view();
        assert_eq!(view.revision, 2);
        assert_eq!(view.error.as_deref(), Some("Train not found"));
        assert!(view.rows.is_empty());
        // no successful refresh yet, so no footer either
        assert!(!view.footer_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_shows_generic_message() {
        let source = MockVehicleSource::new();
        source.push_status(500);

        let handle = spawn_card(&source);
        settle().await;

        let view = handle.view();
        assert_eq!(
            view.error.as_deref(),
            Some("Something went wrong while updating")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_refreshes_leave_one_render_timer() {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(1));
        source.push_vehicle(vehicle_with_stops(2));
        source.push_vehicle(vehicle_with_stops(3));

        let handle = spawn_card(&source);
        settle().await;
        assert_eq!(handle.view().revision, 2);

        // two refreshes back to back: the first completion is
        // superseded and discarded, so only one render follows
        handle.refresh().await;
        handle.refresh().await;
        settle().await;

        let view = handle.view();
        assert_eq!(view.revision, 3);
        assert_eq!(view.rows.len(), 3, "the newer fetch must win");

        // exactly one pending render timer: advancing past the
        // seconds-tier cadence yields exactly one more render
        tokio::time::advance(Duration::from_millis(5_100)).await;
        settle().await;
        assert_eq!(handle.view().revision, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn render_timer_redraws_footer() {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(1));

        let handle = spawn_card(&source);
        settle().await;
        assert_eq!(handle.view().revision, 2);

        // seconds tier: one redraw per 5s cadence
        tokio::time::advance(Duration::from_millis(5_100)).await;
        settle().await;
        assert_eq!(handle.view().revision, 3);

        tokio::time::advance(Duration::from_millis(5_100)).await;
        settle().await;
        assert_eq!(handle.view().revision, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_refresh_fires_after_interval() {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(1));
        source.push_vehicle(vehicle_with_stops(4));

        let handle = spawn_card(&source);
        settle().await;
        assert_eq!(handle.view().revision, 2);
        assert_eq!(handle.view().rows.len(), 1);

        // jump past the refresh interval: one render-timer redraw plus
        // one refresh completion
        tokio::time::advance(Duration::from_secs(61)).await;
        settle().await;

        let view = handle.view();
        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.revision, 4);
        assert_eq!(source.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn set_train_triggers_refresh() {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(1));
        source.push_vehicle(vehicle_with_stops(2));

        let handle = spawn_card(&source);
        settle().await;
        assert_eq!(source.remaining(), 1);

        handle.set_train(TrainId::parse("IC 539").unwrap()).await;
        settle().await;

        let view = handle.view();
        assert_eq!(view.train, "IC 539");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(source.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_all_timers() {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(1));

        let handle = spawn_card(&source);
        settle().await;
        let before = handle.view().revision;

        handle.dispose().await;
        settle().await;

        // neither the render timer nor the refresh timer may fire again
        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(handle.view().revision, before);
        assert_eq!(source.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn error_then_recovery() {
        let source = MockVehicleSource::new();
        source.push_status(404);
        source.push_vehicle(vehicle_with_stops(2));

        let handle = spawn_card(&source);
        settle().await;
        assert!(handle.view().error.is_some());

        handle.refresh().await;
        settle().await;

        let view = handle.view();
        assert!(view.error.is_none());
        assert_eq!(view.rows.len(), 2);
    }
}
