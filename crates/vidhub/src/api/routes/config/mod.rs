use anyhow::Result;
use axum::Router;
use axum::routing::get;

use crate::api::response::{ResourceInfo, ServerConfigResponse};
use crate::api::wrapper::{ApiError, ApiResponse};
use crate::config::VersionedConfig;

pub(super) fn router() -> Router {
    Router::new().route("/server-config", get(get_server_config))
}

/// 前端需要的只读配置
pub async fn get_server_config() -> Result<ApiResponse<ServerConfigResponse>, ApiError> {
    let config = VersionedConfig::get().load_full();
    Ok(ApiResponse::ok(ServerConfigResponse {
        site_name: config.site_name.clone(),
        resources: config.enabled_sites().map(ResourceInfo::from).collect(),
        danmaku_enabled: config.danmaku.enabled,
        netdisk_enabled: config.netdisk.enabled,
        youtube_enabled: config.youtube.enabled && !config.youtube.api_key.is_empty(),
        ai_enabled: config.ai.enabled,
        config_version: config.version,
    }))
}
