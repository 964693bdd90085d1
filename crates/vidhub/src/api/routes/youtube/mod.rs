use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::Extension;
use axum::routing::get;

use crate::api::error::InnerApiError;
use crate::api::helper::upstream_error;
use crate::api::request::YoutubeSearchRequest;
use crate::api::wrapper::{ApiError, ApiResponse, ValidatedQuery};
use crate::config::VersionedConfig;
use crate::upstream::{HubClient, Youtube, YoutubeVideo};

pub(super) fn router() -> Router {
    Router::new().route("/youtube/search", get(search_youtube))
}

/// 转发 YouTube 视频搜索
pub async fn search_youtube(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<YoutubeSearchRequest>,
) -> Result<ApiResponse<Vec<YoutubeVideo>>, ApiError> {
    let config = VersionedConfig::get().load_full();
    if !config.youtube.enabled || config.youtube.api_key.is_empty() {
        return Err(InnerApiError::Forbidden("YouTube 搜索未启用".to_owned()).into());
    }
    let max_results = params.max_results.unwrap_or(config.youtube.max_results).clamp(1, 50);
    let videos = Youtube::new(&client.client, &config.youtube)
        .search(params.q.trim(), max_results)
        .await
        .map_err(|e| upstream_error("YouTube 搜索", e))?;
    Ok(ApiResponse::ok(videos))
}
