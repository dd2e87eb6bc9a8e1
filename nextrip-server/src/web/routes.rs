//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, info, warn};

use crate::itinerary::ConfigError;
use crate::refresh::RefreshError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/journeys", get(list_journeys))
        .route("/journey", get(current_journey))
        .route("/journey/select", post(select_journey))
        .route("/journey/refresh", post(refresh_journey))
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: state.refresher.provider().kind(),
    })
}

/// List the journeys that can be selected.
async fn list_journeys(State(state): State<AppState>) -> Json<JourneyListResponse> {
    let selected = state.session().read().await.journey_id().to_string();

    Json(JourneyListResponse {
        journeys: state
            .catalog
            .journeys()
            .iter()
            .map(JourneySummary::from_def)
            .collect(),
        selected,
    })
}

/// The tracked journey's latest estimates.
async fn current_journey(State(state): State<AppState>) -> Json<JourneyResponse> {
    let session = state.session().read().await;
    Json(JourneyResponse::from_session(&session))
}

/// Switch to another journey and refresh it straight away.
///
/// A failed refresh does not fail the request; the response reports the
/// journey as stale.
async fn select_journey(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JourneyResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: SelectJourneyRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid select request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let journey = state.catalog.select(&req.id).map_err(AppError::from)?;
    state.session().write().await.select(&req.id, journey);

    match state.refresher.run_cycle().await {
        Ok(_) => {}
        // The running cycle notices the new selection and restarts for it.
        Err(RefreshError::Busy) => debug!(journey = %req.id, "refresh already running"),
        Err(e) => info!(journey = %req.id, error = %e, "refresh after selection failed"),
    }

    let session = state.session().read().await;
    Ok(Json(JourneyResponse::from_session(&session)))
}

/// Run a refresh cycle now.
async fn refresh_journey(
    State(state): State<AppState>,
) -> Result<Json<JourneyResponse>, AppError> {
    // Fetch failures are reported through the journey's stale status.
    if let Err(e @ RefreshError::Busy) = state.refresher.run_cycle().await {
        return Err(AppError::Conflict {
            message: e.to_string(),
        });
    }

    let session = state.session().read().await;
    Ok(Json(JourneyResponse::from_session(&session)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::UnknownJourney(_) => AppError::NotFound {
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
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::itinerary::builtin;
    use crate::nextrip::MockNexTripClient;
    use crate::refresh::{BoardSource, RefreshConfig, Refresher, Session};

    const T: i64 = 1_539_990_000_000;

    /// Write one board per stop of every builtin journey, each with a
    /// departure on every route the stop serves.
    fn write_boards(dir: &std::path::Path) {
        let catalog = builtin().unwrap();
        for def in catalog.journeys() {
            let journey = def.build().unwrap();
            for stop in journey.stops().iter() {
                let records: Vec<serde_json::Value> = stop
                    .allowed_routes()
                    .iter()
                    .enumerate()
                    .map(|(i, route)| {
                        serde_json::json!({
                            "Actual": true,
                            "DepartureText": format!("{} Min", i + 1),
                            "DepartureTime": format!("/Date({}-0500)/", T + i as i64 * 60_000),
                            "Route": route.as_str(),
                        })
                    })
                    .collect();
                std::fs::write(
                    dir.join(format!("{}.json", stop.id())),
                    serde_json::to_string(&records).unwrap(),
                )
                .unwrap();
            }
        }
    }

    fn state(dir: &std::path::Path) -> AppState {
        let catalog = builtin().unwrap();
        let journey = catalog.select("home_to_work").unwrap();
        let session = Session::new("home_to_work", journey).shared();
        let source = BoardSource::Mock(MockNexTripClient::new(dir).unwrap());
        let refresher = Refresher::new(Arc::new(source), session, RefreshConfig::default());
        AppState::new(catalog, refresher)
    }

    #[tokio::test]
    async fn health_reports_source() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let Json(response) = health(State(state(dir.path()))).await;

        assert_eq!(response.status, "ok");
        assert_eq!(response.source, "mock");
    }

    #[tokio::test]
    async fn list_shows_catalog_and_selection() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let Json(response) = list_journeys(State(state(dir.path()))).await;

        let ids: Vec<&str> = response.journeys.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["home_to_work", "work_to_home"]);
        assert_eq!(response.selected, "home_to_work");
    }

    #[tokio::test]
    async fn journey_is_pending_before_first_refresh() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let Json(response) = current_journey(State(state(dir.path()))).await;

        assert_eq!(response.status, "pending");
        assert!(response.trips.iter().all(|t| t.first.departure_time_ms.is_none()));
    }

    #[tokio::test]
    async fn refresh_fills_estimates() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let Json(response) = refresh_journey(State(state(dir.path()))).await.unwrap();

        assert_eq!(response.status, "fresh");
        assert!(!response.stale);
        assert!(response.trips.iter().all(|t| t.first.departure_time_ms.is_some()));
    }

    #[tokio::test]
    async fn select_switches_and_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let body = Bytes::from_static(br#"{"id": "work_to_home"}"#);
        let Json(response) = select_journey(State(state(dir.path())), body)
            .await
            .unwrap();

        assert_eq!(response.id, "work_to_home");
        assert_eq!(response.label, "Work to Home");
        assert_eq!(response.generation, 1);
        assert_eq!(response.status, "fresh");
    }

    #[tokio::test]
    async fn select_unknown_journey_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let body = Bytes::from_static(br#"{"id": "nowhere"}"#);
        let err = select_journey(State(state(dir.path())), body)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn select_with_bad_json_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());

        let body = Bytes::from_static(b"not json");
        let err = select_journey(State(state(dir.path())), body)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn missing_stop_data_marks_stale() {
        let dir = tempfile::tempdir().unwrap();
        write_boards(dir.path());
        std::fs::remove_file(dir.path().join("16320.json")).unwrap();

        let Json(response) = refresh_journey(State(state(dir.path()))).await.unwrap();

        assert_eq!(response.status, "stale");
        assert!(response.error.unwrap().contains("16320"));
        assert_eq!(response.updated_at_ms, None);
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (AppError::BadRequest { message: "x".into() }, StatusCode::BAD_REQUEST),
            (AppError::NotFound { message: "x".into() }, StatusCode::NOT_FOUND),
            (AppError::Conflict { message: "x".into() }, StatusCode::CONFLICT),
            (
                AppError::Internal { message: "x".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
