use std::path::PathBuf;

use anyhow::Result;

use crate::config::VersionedConfig;
use crate::utils::signal::ReloadSignal;

/// 收到 SIGHUP 时重新读取配置文件，新配置不合法时继续使用旧配置
pub async fn config_reloader(path: PathBuf) -> Result<()> {
    let mut signal = ReloadSignal::new()?;
    while signal.recv().await.is_some() {
        info!("收到重载信号，重新读取配置文件 {}", path.display());
        match VersionedConfig::get().reload(&path).await {
            Ok(_) => info!("配置重载完成，当前版本 {}", VersionedConfig::get().version()),
            Err(e) => error!("配置重载失败，继续使用旧配置：{:#}", e),
        }
    }
    Ok(())
}
