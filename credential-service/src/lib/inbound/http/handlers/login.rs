use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .credential_service
        .login(body.username, body.password)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}
