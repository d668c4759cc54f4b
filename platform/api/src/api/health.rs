use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::global::ApiGlobal;
use crate::store::MessageStore;

pub async fn health<G: ApiGlobal>(State(global): State<Arc<G>>) -> (StatusCode, Json<serde_json::Value>) {
	if global.store().healthy().await {
		(StatusCode::OK, Json(json!({ "status": "ok" })))
	} else {
		tracing::warn!(store = global.store().name(), "store is unhealthy");
		(StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unhealthy" })))
	}
}
