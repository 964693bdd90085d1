use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::Extension;
use axum::routing::get;

use crate::api::error::InnerApiError;
use crate::api::helper::upstream_error;
use crate::api::request::NetdiskSearchRequest;
use crate::api::wrapper::{ApiError, ApiResponse, ValidatedQuery};
use crate::config::VersionedConfig;
use crate::upstream::{HubClient, Netdisk, NetdiskResult};

pub(super) fn router() -> Router {
    Router::new().route("/netdisk/search", get(search_netdisk))
}

/// 转发网盘资源搜索
pub async fn search_netdisk(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<NetdiskSearchRequest>,
) -> Result<ApiResponse<NetdiskResult>, ApiError> {
    let config = VersionedConfig::get().load_full();
    if !config.netdisk.enabled {
        return Err(InnerApiError::Forbidden("网盘搜索未启用".to_owned()).into());
    }
    let result = Netdisk::new(&client.client, &config.netdisk)
        .search(params.q.trim())
        .await
        .map_err(|e| upstream_error("网盘搜索", e))?;
    Ok(ApiResponse::ok(result))
}
