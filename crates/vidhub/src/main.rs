#[macro_use]
extern crate tracing;

mod api;
mod config;
mod danmaku;
mod database;
mod search;
mod task;
mod upstream;
mod utils;

use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

use crate::config::{ARGS, CONFIG_DIR, VersionedConfig};
use crate::database::{database_connection, migrate_database};
use crate::task::{config_reloader, http_server};
use crate::upstream::HubClient;
use crate::utils::init_logger;
use crate::utils::signal::terminate;

#[tokio::main]
async fn main() {
    let (connection, hub_client) = match init().await {
        Ok(res) => res,
        Err(e) => {
            error!("初始化失败：{:#}", e);
            std::process::exit(1);
        }
    };
    let config_path = CONFIG_DIR.join("config.toml");
    let mut http_server = spawn_task("HTTP 服务", http_server(connection, hub_client));
    let mut config_reloader = spawn_task("配置重载", config_reloader(config_path));

    tokio::select! {
        res = &mut http_server => error!("HTTP 服务意外退出：{:?}", res),
        res = &mut config_reloader => error!("配置重载任务意外退出：{:?}", res),
        _ = terminate() => info!("接收到终止信号，正在终止任务.."),
    }
    http_server.abort();
    config_reloader.abort();
    info!("所有任务已终止，程序结束");
}

fn spawn_task<T: Debug + Send + 'static>(
    task_name: &'static str,
    task: impl Future<Output = Result<T>> + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match task.await {
            Ok(res) => info!("{} 已结束：{:?}", task_name, res),
            Err(e) => error!("{} 异常结束：{:#}", task_name, e),
        }
    })
}

/// 初始化日志、配置与数据库，返回共享的数据库连接和外部请求客户端
async fn init() -> Result<(Arc<DatabaseConnection>, Arc<HubClient>)> {
    LazyLock::force(&ARGS);
    init_logger(&ARGS.log_level);
    info!("欢迎使用 vidhub，当前程序版本：{}", env!("CARGO_PKG_VERSION"));
    VersionedConfig::init(&CONFIG_DIR.join("config.toml"))?;
    migrate_database().await.context("数据库迁移失败")?;
    let connection = database_connection().await.context("获取数据库连接失败")?;
    let hub_client = HubClient::new().context("初始化外部请求客户端失败")?;
    Ok((Arc::new(connection), Arc::new(hub_client)))
}
