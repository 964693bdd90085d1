use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::wrapper::ApiResponse;
use crate::config::VersionedConfig;

/// 中间件：验证请求头中的 Authorization 是否与配置中的 auth_token 匹配
pub async fn auth(headers: HeaderMap, request: Request, next: Next) -> Response {
    let authorized = get_token(&headers).is_some_and(|token| token == VersionedConfig::get().load().auth_token);
    if authorized {
        return next.run(request).await;
    }
    ApiResponse::<()>::unauthorized("auth token does not match").into_response()
}

fn get_token(headers: &HeaderMap) -> Option<&str> {
    headers.get("Authorization").and_then(|v| v.to_str().ok())
}
