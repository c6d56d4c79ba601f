use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, MutexGuard};
use std::time::Instant;

use crate::error::RegistryError;
use crate::geo::Coordinates;
use crate::registry::Registry;
use crate::school::{RankedSchool, School, SchoolDraft};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(pub(super) StatusCode, pub(super) String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Validation(v) => {
                tracing::warn!(field = v.field(), "rejected: {}", v);
                api_error(StatusCode::BAD_REQUEST, v.to_string())
            }
            RegistryError::Store(s) => {
                tracing::error!("store failure: {}", s);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, s.to_string())
            }
            e @ RegistryError::IdsExhausted(_) => {
                tracing::error!("{}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

pub(super) fn lock_registry(state: &AppState) -> Result<MutexGuard<'_, Registry>, ApiError> {
    state.registry().map_err(|_| {
        tracing::error!("registry lock poisoned");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Registry unavailable")
    })
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

// ─── GET /api/schools ────────────────────────────────────────────

/// Raw text so malformed numbers get our error body, not the extractor's.
#[derive(Debug, Default, Deserialize)]
pub struct ProximityQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl ProximityQuery {
    pub(super) fn coordinates(&self) -> Result<Coordinates, RegistryError> {
        Ok(Coordinates::parse(self.latitude.as_deref(), self.longitude.as_deref())?)
    }
}

pub async fn list_schools(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ProximityQuery>, QueryRejection>,
) -> Result<Json<Vec<RankedSchool>>, ApiError> {
    let start = Instant::now();

    let Query(params) = params.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
    let origin = params.coordinates()?;

    let rows = lock_registry(&state)?.list_by_proximity(origin);

    tracing::info!(
        latitude = origin.latitude(),
        longitude = origin.longitude(),
        count = rows.len(),
        "GET /api/schools ({:.1}ms)",
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(rows))
}

// ─── POST /api/schools ───────────────────────────────────────────

pub async fn register_school(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SchoolDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<School>), ApiError> {
    let start = Instant::now();

    let Json(draft) = payload.map_err(|e| {
        tracing::warn!("rejected body: {}", e.body_text());
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    })?;

    let school = lock_registry(&state)?.register(&draft)?;

    tracing::info!(
        id = school.id,
        name = %school.name,
        "POST /api/schools ({:.1}ms)",
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok((StatusCode::CREATED, Json(school)))
}

// ─── GET /api/schools/{id} ───────────────────────────────────────

pub async fn get_school(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<School>, ApiError> {
    let Path(id) = id.map_err(|_| api_error(StatusCode::BAD_REQUEST, "School id must be a positive integer"))?;

    let school = lock_registry(&state)?.get(id).cloned();
    school
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("No school with id {}", id)))
}

// ─── Fallback ────────────────────────────────────────────────────

pub async fn not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        api_error(StatusCode::NOT_FOUND, format!("No route for {}", uri.path())).into_response()
    } else {
        (StatusCode::NOT_FOUND, Html(static_files::NOT_FOUND_HTML)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Registry::in_memory()))
    }

    fn query(lat: Option<&str>, lon: Option<&str>) -> Result<Query<ProximityQuery>, QueryRejection> {
        Ok(Query(ProximityQuery {
            latitude: lat.map(String::from),
            longitude: lon.map(String::from),
        }))
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_sorted_by_distance() {
        let Json(rows) = list_schools(State(test_state()), query(Some("39.8026"), Some("-89.6437")))
            .await
            .unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.school.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rows[0].distance, 0.0);
    }

    #[tokio::test]
    async fn test_list_missing_params() {
        let err = list_schools(State(test_state()), query(None, Some("-89.6"))).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Missing required field: latitude");
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_list_invalid_params() {
        let state = test_state();
        for (lat, lon) in [("abc", "0"), ("0", "181"), ("-90.5", "0"), ("", "")] {
            let err = list_schools(State(state.clone()), query(Some(lat), Some(lon)))
                .await
                .unwrap_err();
            assert_eq!(err.0, StatusCode::BAD_REQUEST, "{} {}", lat, lon);
        }
    }

    #[tokio::test]
    async fn test_register_then_list() {
        let state = test_state();
        let draft = SchoolDraft::new("Lincoln Middle", "1 Main St", 39.8, -89.64);
        let (status, Json(school)) = register_school(State(state.clone()), Ok(Json(draft)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(school.id, 4);

        let Json(rows) = list_schools(State(state), query(Some("39.8"), Some("-89.64")))
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].school.id, 4);
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let state = test_state();
        let err = register_school(State(state.clone()), Ok(Json(SchoolDraft::new("", "addr", 10.0, 10.0))))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let err = register_school(State(state.clone()), Ok(Json(SchoolDraft::new("X", "Y", 91.0, 0.0))))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(err.1.contains("latitude"));

        assert_eq!(lock_registry(&state).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_register_response_has_no_distance() {
        let draft = SchoolDraft::new("Lincoln", "1 Main St", "39.8", "-89.6");
        let resp = register_school(State(test_state()), Ok(Json(draft)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["id"], 4);
        assert_eq!(body["latitude"], 39.8);
        assert!(body.get("distance").is_none());
    }

    #[tokio::test]
    async fn test_get_school() {
        let state = test_state();
        let Json(s) = get_school(State(state.clone()), Ok(Path(3))).await.unwrap();
        assert_eq!(s.name, "Southview Academy");

        let err = get_school(State(state), Ok(Path(99))).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_not_found_shapes() {
        let resp = not_found(Uri::from_static("/api/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], 404);

        let resp = not_found(Uri::from_static("/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }
}
