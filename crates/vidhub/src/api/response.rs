use serde::Serialize;

use crate::config::ApiSite;

#[derive(Serialize)]
pub struct ResourceInfo {
    pub key: String,
    pub name: String,
    pub api: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&ApiSite> for ResourceInfo {
    fn from(site: &ApiSite) -> Self {
        Self {
            key: site.key.clone(),
            name: site.name.clone(),
            api: site.api.clone(),
            detail: site.detail.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct AiRecommendResponse {
    pub reply: String,
    /// 回复中用《》包裹的作品名，按出现顺序去重
    pub recommendations: Vec<String>,
}

/// 对外公开的只读配置摘要，不包含任何密钥
#[derive(Serialize)]
pub struct ServerConfigResponse {
    pub site_name: String,
    pub resources: Vec<ResourceInfo>,
    pub danmaku_enabled: bool,
    pub netdisk_enabled: bool,
    pub youtube_enabled: bool,
    pub ai_enabled: bool,
    pub config_version: u64,
}
