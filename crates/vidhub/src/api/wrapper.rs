use std::borrow::Cow;

use anyhow::Error;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::error::InnerApiError;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<Cow<'static, str>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: 200,
            data: Some(data),
            message: None,
        }
    }

    fn error(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code: status.as_u16(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::error(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::error(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::error(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<Cow<'static, str>>) -> Self {
        Self::error(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal_server_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(self),
        )
            .into_response()
    }
}

pub struct ApiError(Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let Some(inner_error) = self.0.downcast_ref::<InnerApiError>() {
            let message = self.0.to_string();
            return match inner_error {
                InnerApiError::BadRequest(_) => ApiResponse::<()>::bad_request(message),
                InnerApiError::Forbidden(_) => ApiResponse::<()>::forbidden(message),
                InnerApiError::NotFound(_) => ApiResponse::<()>::not_found(message),
                InnerApiError::BadGateway(_) => ApiResponse::<()>::bad_gateway(message),
            }
            .into_response();
        }
        error!("处理请求时遇到未预期的错误：{:#}", self.0);
        ApiResponse::<()>::internal_server_error(format!("{:#}", self.0)).into_response()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| InnerApiError::BadRequest(e.body_text()))?;
        value
            .validate()
            .map_err(|e| InnerApiError::BadRequest(e.to_string()))?;
        Ok(ValidatedJson(value))
    }
}

/// 与 `ValidatedJson` 相同，用于查询参数
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| InnerApiError::BadRequest(e.body_text()))?;
        value
            .validate()
            .map_err(|e| InnerApiError::BadRequest(e.to_string()))?;
        Ok(ValidatedQuery(value))
    }
}
