//! JSON API backing the travel planner page
//!
//! The page is a static frontend; these handlers own session state, input
//! validation, prompt construction, and the single outbound generation call.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::generate::Generator;
use crate::query::{self, Language, SortBy, TravelMode, TravelPreference, TravelQuery};
use crate::session::{SessionFields, SessionStore};

const SESSION_COOKIE: &str = "sid";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    sessions: SessionStore,
    generator: Option<Arc<dyn Generator>>,
    config_error: Option<String>,
}

impl AppState {
    /// `generator` is `None` exactly when client construction failed at
    /// startup; `config_error` then carries the message the page renders.
    #[must_use]
    pub fn new(
        sessions: SessionStore,
        generator: Option<Arc<dyn Generator>>,
        config_error: Option<String>,
    ) -> Self {
        Self {
            sessions,
            generator,
            config_error,
        }
    }
}

/// Everything the page needs to render its widgets
#[derive(Debug, Serialize, Deserialize)]
pub struct BootstrapResponse {
    pub session: SessionFields,
    pub travel_modes: Vec<String>,
    pub travel_preferences: Vec<String>,
    pub sort_keys: Vec<String>,
    pub languages: Vec<String>,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub config_error: Option<String>,
}

/// Selection fields submitted with a search; the locations come from the
/// session store, not from the request body
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanRequest {
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub travel_mode: TravelMode,
    pub travel_preference: TravelPreference,
    pub sort_by: SortBy,
    pub language: Language,
}

/// Outcome of a search, rendered as the success, warning, or error block
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlanResponse {
    Success { text: String },
    Warning { message: String },
    Error { message: String },
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/bootstrap", get(bootstrap))
        .route("/session", put(update_session))
        .route("/session/swap", post(swap_session))
        .route("/plan", post(plan))
        .with_state(state)
}

/// Parse the session id out of the `Cookie` header
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

/// Existing session id, or a fresh one for first contact
fn session_id_or_new(headers: &HeaderMap) -> Uuid {
    session_id(headers).unwrap_or_else(Uuid::new_v4)
}

/// Attach the session cookie so the id survives across interactions
fn with_session_cookie(id: Uuid, body: impl IntoResponse) -> Response {
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; SameSite=Lax");
    let mut response = body.into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

async fn bootstrap(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id_or_new(&headers);
    let session = state.sessions.get_or_create(id).await;

    let (min_date, max_date) = query::date_bounds(Local::now().date_naive());
    let body = BootstrapResponse {
        session,
        travel_modes: TravelMode::ALL.iter().map(ToString::to_string).collect(),
        travel_preferences: TravelPreference::ALL
            .iter()
            .map(ToString::to_string)
            .collect(),
        sort_keys: SortBy::ALL.iter().map(ToString::to_string).collect(),
        languages: Language::ALL.iter().map(ToString::to_string).collect(),
        min_date,
        max_date,
        config_error: state.config_error.clone(),
    };

    with_session_cookie(id, Json(body))
}

async fn update_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(fields): Json<SessionFields>,
) -> Response {
    let id = session_id_or_new(&headers);
    let fields = state.sessions.update(id, fields).await;
    with_session_cookie(id, Json(fields))
}

async fn swap_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = session_id_or_new(&headers);
    let fields = state.sessions.swap(id).await;
    with_session_cookie(id, Json(fields))
}

async fn plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PlanRequest>,
) -> Response {
    let id = session_id_or_new(&headers);
    let fields = state.sessions.get_or_create(id).await;

    let query = TravelQuery {
        start_location: fields.start_location,
        end_location: fields.end_location,
        departure_date: request.departure_date,
        return_date: request.return_date,
        travel_mode: request.travel_mode,
        travel_preference: request.travel_preference,
        sort_by: request.sort_by,
        language: request.language,
    };

    // Validation failures are user-correctable; no network call is made
    if let Err(e) = query.validate(Local::now().date_naive()) {
        warn!("Rejected search: {e}");
        return with_session_cookie(
            id,
            Json(PlanResponse::Warning {
                message: e.user_message(),
            }),
        );
    }

    let Some(generator) = &state.generator else {
        let message = state
            .config_error
            .clone()
            .unwrap_or_else(|| "Generation is not configured.".to_string());
        return with_session_cookie(id, Json(PlanResponse::Error { message }));
    };

    info!(
        "Searching travel options from {} to {}",
        query.start_location, query.end_location
    );

    match generator.generate(&query.prompt()).await {
        Ok(text) => with_session_cookie(id, Json(PlanResponse::Success { text })),
        Err(e) => {
            warn!("Generation failed: {e}");
            with_session_cookie(
                id,
                Json(PlanResponse::Error {
                    message: e.user_message(),
                }),
            )
        }
    }
}
