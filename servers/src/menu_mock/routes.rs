//! HTTP surface of the mock backend.
//!
//! `GET /items` answers with the bare array like the real backend; the other
//! JSON routes use the `{ success, data, message }` envelope.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use lib_armenu::menu::models::{ItemId, NewItem};
use lib_armenu::menu::validation::Validate;
use lib_armenu::retrieve::ky_http::{ADMIN_KEY_HEADER, REQUEST_ID_HEADER};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::state::{ArView, MockState};

/// A 1x1 transparent PNG returned for every QR request.
pub const QR_PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49,
    0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

pub fn router(state: MockState) -> Router {
    let admin = Router::new()
        .route("/admin/verify", post(admin_verify))
        .route("/admin/items", get(admin_list_items))
        .route("/admin/items/add", post(admin_add_item))
        .route("/admin/items/{id}", delete(admin_delete_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_key));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/items", get(list_items))
        .route("/menu/{id}/nutrition", get(nutrition))
        .route("/qr/{id}", get(qr_png))
        .route("/analytics/ar-view", post(track_ar_view))
        .merge(admin)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn failure(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message,
            "error": { "code": code, "message": message },
        })),
    )
        .into_response()
}

// Echoes X-Request-ID and logs every request with it
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.headers().get(REQUEST_ID_HEADER).cloned();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let id_text = request_id.as_ref().and_then(|v| v.to_str().ok()).unwrap_or("-").to_string();
    info!(
        request_id = %id_text,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );
    if let Some(id) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, id);
    }
    response
}

async fn healthz() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

async fn list_items(State(state): State<MockState>) -> Response {
    if state.begin_item_request() {
        warn!("injected failure for GET /items");
        return failure(StatusCode::SERVICE_UNAVAILABLE, "SERVER_ERROR", "Catalog temporarily unavailable");
    }
    (StatusCode::OK, Json(state.items().await)).into_response()
}

async fn nutrition(State(state): State<MockState>, Path(id): Path<ItemId>) -> Response {
    match state.nutrition(id).await {
        Some(facts) => success(StatusCode::OK, facts),
        None => failure(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            &format!("No nutrition facts for item {}", id),
        ),
    }
}

async fn qr_png(State(state): State<MockState>, Path(id): Path<ItemId>) -> Response {
    if !state.has_item(id).await {
        return failure(StatusCode::NOT_FOUND, "NOT_FOUND", &format!("Item {} not found", id));
    }
    (
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        QR_PLACEHOLDER_PNG,
    )
        .into_response()
}

async fn track_ar_view(State(state): State<MockState>, Json(view): Json<ArView>) -> Response {
    let delay = state.ar_view_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    info!(item_id = view.item_id, platform = %view.platform, "AR view recorded");
    state.record_view(view).await;
    StatusCode::NO_CONTENT.into_response()
}

// Runs before any body extractor of the admin routes
async fn require_admin_key(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let presented = request.headers().get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok());
    if !state.admin_key_matches(presented) {
        return failure(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or missing admin key");
    }
    next.run(request).await
}

async fn admin_verify() -> Response {
    success(StatusCode::OK, json!({ "valid": true }))
}

async fn admin_list_items(State(state): State<MockState>) -> Response {
    success(StatusCode::OK, state.items().await)
}

async fn admin_add_item(State(state): State<MockState>, Json(new_item): Json<NewItem>) -> Response {
    if let Err(e) = new_item.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "success": false,
                "message": e.message,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": e.message,
                    "details": e.details,
                },
            })),
        )
            .into_response();
    }

    let item = state.add_item(new_item).await;
    info!(item_id = item.id, name = %item.name, "item added");
    success(StatusCode::CREATED, item)
}

async fn admin_delete_item(State(state): State<MockState>, Path(id): Path<ItemId>) -> Response {
    if state.delete_item(id).await {
        info!(item_id = id, "item deleted");
        success(StatusCode::OK, json!({ "id": id }))
    } else {
        failure(StatusCode::NOT_FOUND, "NOT_FOUND", &format!("Item {} not found", id))
    }
}
