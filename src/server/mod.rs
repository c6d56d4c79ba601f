mod forms;
mod handlers;
mod state;
mod static_files;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::registry::Registry;

pub fn build_router(registry: Registry) -> Router {
    let state = Arc::new(AppState::new(registry));

    let api = Router::new()
        .route(
            "/api/schools",
            get(handlers::list_schools).post(handlers::register_school),
        )
        .route("/api/schools/{id}", get(handlers::get_school))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/schools", get(forms::search_page).post(forms::create_school))
        .route("/schools/new", get(forms::new_school_page))
        .merge(api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, registry: Registry) -> std::io::Result<()> {
    let app = build_router(registry);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("School Locator listening on http://{}", addr);
    tracing::info!("Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(req: Request<Body>) -> Response {
        build_router(Registry::in_memory()).oneshot(req).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, content_type: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        serde_json::from_str(&body_text(resp).await).unwrap()
    }

    #[tokio::test]
    async fn test_list_through_router() {
        let resp = send(get("/api/schools?latitude=39.8026&longitude=-89.6437")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");

        let body = body_json(resp).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["distance"], 0.0);
    }

    #[tokio::test]
    async fn test_duplicate_query_param_is_json_400() {
        let resp = send(get("/api/schools?latitude=1&latitude=2&longitude=3")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("latitude"));
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_json_400() {
        let resp = send(post("/api/schools", "application/json", "{not json")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], 400);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json_400() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/schools")
            .body(Body::from(r#"{"name":"A","address":"B","latitude":1,"longitude":2}"#))
            .unwrap();
        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], 400);
    }

    #[tokio::test]
    async fn test_register_through_router() {
        let resp = send(post(
            "/api/schools",
            "application/json",
            r#"{"name":"Lincoln Middle","address":"1 Main St","latitude":39.8,"longitude":-89.6}"#,
        ))
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
        let body = body_json(resp).await;
        assert_eq!(body["id"], 4);
        assert!(body.get("distance").is_none());
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let resp = send(get("/api/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["error"], "No route for /api/nope");
    }

    #[tokio::test]
    async fn test_unknown_page_is_html_404() {
        let resp = send(get("/nowhere")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_text(resp).await.contains("<h1>404</h1>"));
    }

    #[tokio::test]
    async fn test_bad_school_id_is_json_400() {
        let resp = send(get("/api/schools/abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], 400);
    }

    #[tokio::test]
    async fn test_html_form_post_through_router() {
        let resp = send(post(
            "/schools",
            "application/x-www-form-urlencoded",
            "name=Lincoln+Middle&address=1+Main+St&latitude=39.8&longitude=-89.6",
        ))
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert!(body_text(resp).await.contains("registered with id 4"));
    }

    #[tokio::test]
    async fn test_html_form_wrong_content_type_is_400_page() {
        let resp = send(post("/schools", "text/plain", "name=X")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(resp).await.contains(r#"class="error""#));
    }

    #[tokio::test]
    async fn test_pages_are_not_marked_no_store() {
        let resp = send(get("/")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::CACHE_CONTROL).is_none());
    }
}
