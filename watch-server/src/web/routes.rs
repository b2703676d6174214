//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use chrono::Local;
use tower_http::services::ServeDir;
use tracing::info;

use crate::card::CardHandle;
use crate::domain::TrainId;
use crate::irail::{FetchError, TimeSelector};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/cards", get(list_cards))
        .route("/api/vehicle", get(lookup_vehicle))
        .route("/api/connections", get(search_connections))
        .route("/cards", post(create_card))
        .route("/cards/:id", delete(delete_card))
        .route("/cards/:id/delete", post(delete_card_form))
        .route("/cards/:id/refresh", post(refresh_card))
        .route("/theme/toggle", post(toggle_theme))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render_template<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// Index page: watched-train cards plus the add-train forms.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    // The station list is a convenience for the form datalist; a failed
    // fetch must not take the whole page down
    let stations = match state.stations.get_or_fetch(&state.irail).await {
        Ok(stations) => stations,
        Err(e) => {
            tracing::warn!(error = %e, "station list unavailable");
            Vec::new()
        }
    };

    let cards = state
        .cards
        .views()
        .await
        .into_iter()
        .map(|(id, card)| CardEntry { id, card })
        .collect();

    let template = IndexTemplate {
        lang: state.language.as_str(),
        theme: state.theme.read().await.as_str(),
        strings: Strings::resolve(&state.i18n, state.language),
        cards,
        stations,
    };
    render_template(&template)
}

/// All station names, for autocomplete.
async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<StationsResponse>, AppError> {
    let stations = state.stations.get_or_fetch(&state.irail).await?;
    Ok(Json(StationsResponse { stations }))
}

/// Current view of every card.
async fn list_cards(State(state): State<AppState>) -> Json<CardListResponse> {
    let cards = state
        .cards
        .views()
        .await
        .iter()
        .map(|(id, view)| CardResult::from_view(*id, view))
        .collect();

    Json(CardListResponse { cards })
}

/// Look up a vehicle's itinerary; HTML renders a stop picker.
async fn lookup_vehicle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<VehicleQuery>,
) -> Result<Response, AppError> {
    let train = TrainId::parse(&req.number).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let vehicle = state.irail.get_vehicle(&train).await?;
    let stations: Vec<String> = vehicle.stops.iter().map(|s| s.station.clone()).collect();

    if accepts_html(&headers) {
        let template = VehicleStopsTemplate {
            lang: state.language.as_str(),
            theme: state.theme.read().await.as_str(),
            strings: Strings::resolve(&state.i18n, state.language),
            name: vehicle.name.clone(),
            number: train.to_string(),
            stations,
        };
        Ok(render_template(&template)?.into_response())
    } else {
        Ok(Json(VehicleResult {
            name: vehicle.name,
            stations,
        })
        .into_response())
    }
}

/// Search connections between two stations.
///
/// The HTML rendition folds lookup failures into the page itself: no
/// match reads "no connection found", anything else a load error, so
/// the search form stays usable either way.
async fn search_connections(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<ConnectionsQuery>,
) -> Result<Response, AppError> {
    let timesel = TimeSelector::parse(req.timesel.as_deref().unwrap_or_default());
    let time = req
        .time
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Local::now().format("%H:%M").to_string());

    let result = state
        .irail
        .get_connections(&req.from, &req.to, timesel, &time)
        .await;

    if accepts_html(&headers) {
        let (connections, message) = match result {
            Ok(connections) => (connections, None),
            Err(e) => {
                tracing::warn!(error = %e, from = %req.from, to = %req.to, "connection search failed");
                let key = match e.status() {
                    Some(404) => "modal.connectionNotFound",
                    _ => "modal.connectionLoadError",
                };
                (Vec::new(), Some(state.i18n.t(state.language, key)))
            }
        };

        let strings = Strings::resolve(&state.i18n, state.language);
        let connections = connections
            .iter()
            .map(|c| ConnectionView::from_connection(c, &strings))
            .collect();

        let template = ConnectionListTemplate {
            lang: state.language.as_str(),
            theme: state.theme.read().await.as_str(),
            strings,
            connections,
            message,
        };
        Ok(render_template(&template)?.into_response())
    } else {
        let connections = result?;
        Ok(Json(ConnectionsResult {
            connections: connections
                .iter()
                .map(ConnectionResult::from_connection)
                .collect(),
        })
        .into_response())
    }
}

/// Create a card and start watching a train.
async fn create_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CreateCardForm>,
) -> Result<Response, AppError> {
    let train = TrainId::parse(&form.train_number).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let handle = CardHandle::spawn(
        state.irail.clone(),
        state.i18n.clone(),
        state.language,
        state.card_config.clone(),
        train.clone(),
        form.station.unwrap_or_default(),
    );
    let id = state.cards.insert(handle).await;

    info!(card = id, train = %train, "card created");

    if accepts_html(&headers) {
        Ok(Redirect::to("/").into_response())
    } else {
        Ok((StatusCode::CREATED, Json(CardCreated { id })).into_response())
    }
}

/// Force an immediate refresh of one card.
async fn refresh_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let handle = state.cards.get(id).await.ok_or_else(|| AppError::NotFound {
        message: format!("No card with id {}", id),
    })?;
    handle.refresh().await;

    if accepts_html(&headers) {
        Ok(Redirect::to("/").into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

/// Dispose a card and remove it from the registry.
async fn dispose_card(state: &AppState, id: u64) -> Result<(), AppError> {
    let handle = state
        .cards
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("No card with id {}", id),
        })?;
    handle.dispose().await;

    info!(card = id, "card removed");
    Ok(())
}

/// Remove a card (API form).
async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    dispose_card(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a card (browser form fallback, forms cannot DELETE).
async fn delete_card_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    dispose_card(&state, id).await?;
    Ok(Redirect::to("/"))
}

/// Flip between light and dark theme.
async fn toggle_theme(State(state): State<AppState>) -> Redirect {
    let mut theme = state.theme.write().await;
    *theme = theme.toggled();
    Redirect::to("/")
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e.status() {
            Some(404) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
