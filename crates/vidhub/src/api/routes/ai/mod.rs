use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use axum::Router;
use axum::extract::Extension;
use axum::routing::post;
use regex::Regex;

use crate::api::error::InnerApiError;
use crate::api::request::AiRecommendRequest;
use crate::api::response::AiRecommendResponse;
use crate::api::wrapper::{ApiError, ApiResponse, ValidatedJson};
use crate::config::VersionedConfig;
use crate::upstream::{ChatMessage, HubClient, OpenAi};

static QUOTED_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"《([^》]+)》").expect("invalid title regex"));

pub(super) fn router() -> Router {
    Router::new().route("/ai/recommend", post(recommend))
}

/// 按出现顺序提取《》中的作品名并去重
fn extract_recommendations(reply: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    QUOTED_TITLE
        .captures_iter(reply)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|title| !title.is_empty() && seen.insert(title.clone()))
        .collect()
}

/// 影视推荐对话，模型接口不可用时返回空回复
pub async fn recommend(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedJson(payload): ValidatedJson<AiRecommendRequest>,
) -> Result<ApiResponse<AiRecommendResponse>, ApiError> {
    let config = VersionedConfig::get().load_full();
    if !config.ai.enabled {
        return Err(InnerApiError::Forbidden("AI 推荐未启用".to_owned()).into());
    }
    let history = payload
        .messages
        .into_iter()
        .map(|m| ChatMessage {
            role: m.role,
            content: m.content,
        })
        .collect();
    let reply = OpenAi::new(&client.client, &config.ai)
        .chat(history)
        .await
        .unwrap_or_else(|e| {
            warn!("调用模型 {} 获取推荐失败：{:#}", config.ai.model, e);
            String::new()
        });
    Ok(ApiResponse::ok(AiRecommendResponse {
        recommendations: extract_recommendations(&reply),
        reply,
    }))
}
