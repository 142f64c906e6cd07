use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Liveness check. No authentication.
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Clinic intake is alive".into(),
    })
}
