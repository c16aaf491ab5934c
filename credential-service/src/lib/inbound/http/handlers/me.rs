use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            status: "ok",
            id: user.user_id.to_string(),
            name: user.username,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub status: &'static str,
    pub id: String,
    pub name: String,
}
