use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::Extension;
use axum::routing::get;

use crate::api::helper::upstream_error;
use crate::api::request::{DoubanDetailsRequest, RecentHotRequest};
use crate::api::wrapper::{ApiError, ApiResponse, ValidatedQuery};
use crate::config::VersionedConfig;
use crate::upstream::{Douban, DoubanDetails, DoubanItem, HubClient};

pub(super) fn router() -> Router {
    Router::new()
        .route("/douban/details", get(get_details))
        .route("/douban/recent_hot", get(get_recent_hot))
}

/// 抓取豆瓣条目详情
pub async fn get_details(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<DoubanDetailsRequest>,
) -> Result<ApiResponse<DoubanDetails>, ApiError> {
    let config = VersionedConfig::get().load_full();
    let details = Douban::new(&client, &config.douban)
        .details(&params.id)
        .await
        .map_err(|e| upstream_error(&format!("获取豆瓣条目 {} 的详情", params.id), e))?;
    Ok(ApiResponse::ok(details))
}

/// 豆瓣最近热门，请求失败时返回空列表
pub async fn get_recent_hot(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<RecentHotRequest>,
) -> Result<ApiResponse<Vec<DoubanItem>>, ApiError> {
    let config = VersionedConfig::get().load_full();
    let items = Douban::new(&client, &config.douban)
        .recent_hot(&params.kind, &params.category, &params.r#type, params.start, params.limit)
        .await
        .unwrap_or_else(|e| {
            warn!("获取豆瓣{}「{}」榜单失败：{:#}", params.kind, params.category, e);
            Vec::new()
        });
    Ok(ApiResponse::ok(items))
}
