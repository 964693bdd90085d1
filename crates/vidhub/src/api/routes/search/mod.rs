use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::Extension;
use axum::routing::get;

use crate::api::error::InnerApiError;
use crate::api::helper::upstream_error;
use crate::api::request::{AggregateSearchRequest, DetailRequest, OneSearchRequest, SearchRequest};
use crate::api::response::ResourceInfo;
use crate::api::wrapper::{ApiError, ApiResponse, ValidatedQuery};
use crate::config::{ApiSite, Config, VersionedConfig};
use crate::search::{
    AggregatedResult, DEFAULT_LIMIT, HttpSiteSearcher, SearchPage, aggregate, fan_out, filter_results, flat_view,
};
use crate::upstream::{ApiSiteClient, HubClient, SearchResult};

pub(super) fn router() -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/search/aggregate", get(search_aggregate))
        .route("/search/one", get(search_one))
        .route("/search/resources", get(resources))
        .route("/detail", get(detail))
}

async fn search_sites(client: &HubClient, config: &Config, sites: Vec<&ApiSite>, query: &str) -> Vec<SearchResult> {
    let searchers = sites
        .into_iter()
        .map(|site| {
            HttpSiteSearcher::new(
                &client.client,
                site,
                config.search.max_page,
                config.search.timeout(),
            )
        })
        .collect::<Vec<_>>();
    let results = fan_out(&searchers, query.trim(), config.search.timeout()).await;
    filter_results(results, &config.search.content_filter)
}

/// 搜索所有视频源，去重排序后分页返回
pub async fn search(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<SearchRequest>,
) -> Result<ApiResponse<SearchPage>, ApiError> {
    let config = VersionedConfig::get().load_full();
    let results = search_sites(&client, &config, config.enabled_sites().collect(), &params.q).await;
    Ok(ApiResponse::ok(flat_view(
        results,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_LIMIT),
    )))
}

/// 搜索所有视频源，按作品分组返回
pub async fn search_aggregate(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<AggregateSearchRequest>,
) -> Result<ApiResponse<Vec<AggregatedResult>>, ApiError> {
    let config = VersionedConfig::get().load_full();
    let results = search_sites(&client, &config, config.enabled_sites().collect(), &params.q).await;
    Ok(ApiResponse::ok(aggregate(results)))
}

/// 只搜索指定的视频源
pub async fn search_one(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<OneSearchRequest>,
) -> Result<ApiResponse<Vec<SearchResult>>, ApiError> {
    let config = VersionedConfig::get().load_full();
    let Some(site) = config.find_site(&params.resource_id) else {
        return Err(InnerApiError::NotFound(format!("视频源 {}", params.resource_id)).into());
    };
    Ok(ApiResponse::ok(
        search_sites(&client, &config, vec![site], &params.q).await,
    ))
}

/// 列出启用的视频源
pub async fn resources() -> Result<ApiResponse<Vec<ResourceInfo>>, ApiError> {
    let config = VersionedConfig::get().load_full();
    Ok(ApiResponse::ok(config.enabled_sites().map(ResourceInfo::from).collect()))
}

pub async fn detail(
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<DetailRequest>,
) -> Result<ApiResponse<SearchResult>, ApiError> {
    let config = VersionedConfig::get().load_full();
    let Some(site) = config.find_site(&params.source) else {
        return Err(InnerApiError::NotFound(format!("视频源 {}", params.source)).into());
    };
    let detail = ApiSiteClient::new(&client.client, site, config.search.timeout())
        .detail(&params.id)
        .await
        .map_err(|e| upstream_error(&format!("获取 {} 中视频 {} 的详情", site.name, params.id), e))?;
    Ok(ApiResponse::ok(detail))
}
