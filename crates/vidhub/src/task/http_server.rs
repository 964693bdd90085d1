use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::{Extension, ServiceExt};
use reqwest::Method;
use sea_orm::DatabaseConnection;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;

use crate::api::router;
use crate::config::VersionedConfig;
use crate::upstream::HubClient;

pub async fn http_server(database_connection: Arc<DatabaseConnection>, hub_client: Arc<HubClient>) -> Result<()> {
    let app = router()
        .layer(Extension(database_connection))
        .layer(Extension(hub_client))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE]),
        );
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);
    let bind_address = VersionedConfig::get().load().bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("bind address {} failed", bind_address))?;
    info!("HTTP 服务已启动：http://{}", bind_address);
    Ok(axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?)
}
