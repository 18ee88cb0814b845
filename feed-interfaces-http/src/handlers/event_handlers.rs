use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use feed_application::queries::event_queries;
use feed_application::AppState;
use feed_domain::Event;

use crate::error::HttpError;
use crate::middleware::authorize;

/// `GET /v1/events`: parameters are kept in request order so compiled
/// queries are reproducible.
pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Event>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let Query(params) = params.map_err(|err| HttpError::BadRequest(err.body_text()))?;
    let events = event_queries::search_events(&state, params).await?;
    Ok(Json(events))
}
