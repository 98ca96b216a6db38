//! Routes for the sketch API.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use sketchboard_core::{CreateSketchRequest, Sketch, SketchId};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;

pub const PUBLIC_OBJECT_ROUTE: &str = "/storage/v1/object/public/{bucket}/{*path}";

/// Builds the application router with sketch routes mounted under `api_prefix`.
pub fn router(state: AppState, api_prefix: &str, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route("/sketches", get(list_sketches).post(create_sketch))
        .route("/sketches/{id}", get(get_sketch).delete(delete_sketch));

    // axum refuses to nest at the root, so an empty prefix merges instead.
    let prefix = api_prefix.trim_matches('/');
    let mut app = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&format!("/{prefix}"), api)
    };

    if state.blobs.is_some() {
        app = app.route(PUBLIC_OBJECT_ROUTE, get(serve_object));
    }

    app.layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn list_sketches(State(state): State<AppState>) -> Result<Json<Vec<Sketch>>, ApiError> {
    let sketches = state.service.find_all().await?;
    debug!(count = sketches.len(), "Listed sketches");
    Ok(Json(sketches))
}

async fn create_sketch(
    State(state): State<AppState>,
    payload: Result<Json<CreateSketchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Sketch>), ApiError> {
    let Json(request) = payload?;
    let request = request.validate().map_err(sketchboard_core::Error::from)?;
    let sketch = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(sketch)))
}

async fn get_sketch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sketch>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.find_one(id).await?))
}

async fn delete_sketch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn serve_object(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound(format!("Object {bucket}/{path} not found"));
    let blobs = state.blobs.as_ref().ok_or_else(not_found)?;
    if blobs.bucket() != bucket {
        return Err(not_found());
    }
    let object = blobs.get(&path).ok_or_else(not_found)?;
    Ok(([(header::CONTENT_TYPE, object.content_type)], object.bytes).into_response())
}

fn parse_id(raw: &str) -> Result<SketchId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid sketch ID: {raw}")))
}
