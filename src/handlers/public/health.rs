use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::server::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Portal Admin API",
            "version": version,
            "description": "Mock backend for the job portal admin console",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/login (public - token acquisition)",
                "auth": "/api/auth/whoami (protected)",
                "data": "/api/data/:resource[/:id] (protected)",
            },
            "resources": crate::entities::Resource::ALL
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>(),
        }
    }))
}

/// GET /health - liveness plus fixture counts
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let data = state.store.read().await;

    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "fixtures": {
                "jobs": data.jobs.len(),
                "users": data.users.len(),
                "coupons": data.coupons.len(),
            }
        }
    }))
}
