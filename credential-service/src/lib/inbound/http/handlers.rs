use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credential::errors::LoginError;
use crate::credential::errors::RefreshError;
use crate::credential::errors::RegisterError;
use crate::credential::models::LoginResult;

pub mod health;
pub mod login;
pub mod me;
pub mod refresh;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(Vec<String>),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, data) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorData::message("Internal server error".to_string()),
                )
            }
            ApiError::BadRequest(errors) => (
                StatusCode::BAD_REQUEST,
                ApiErrorData {
                    message: "Validation failed".to_string(),
                    errors,
                },
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ApiErrorData::message(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ApiErrorData::message(msg)),
        };

        (status, Json(ApiResponseBody::new(status, data))).into_response()
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(errors) => ApiError::BadRequest(errors.messages()),
            RegisterError::DuplicateUser(_) => ApiError::Conflict("User already exists".to_string()),
            RegisterError::Hashing(_) | RegisterError::Internal(_) | RegisterError::Storage(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            LoginError::Token(_) | LoginError::Internal(_) | LoginError::Storage(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::InvalidOrExpiredToken => ApiError::Unauthorized(err.to_string()),
            RefreshError::Token(_) | RefreshError::Storage(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiErrorData {
    fn message(message: String) -> Self {
        Self {
            message,
            errors: Vec::new(),
        }
    }
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub status: &'static str,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<LoginResult> for TokenResponseData {
    fn from(result: LoginResult) -> Self {
        Self {
            status: "ok",
            username: result.username,
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_in: result.access_token_expires_in,
        }
    }
}
