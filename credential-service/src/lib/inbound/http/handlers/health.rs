use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

pub async fn health() -> ApiSuccess<HealthResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        HealthResponseData {
            status: "ok",
            message: "Credential service is running",
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub status: &'static str,
    pub message: &'static str,
}
