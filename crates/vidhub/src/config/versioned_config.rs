use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result, anyhow, bail};
use arc_swap::{ArcSwap, Guard};

use crate::config::Config;

pub static VERSIONED_CONFIG: OnceLock<VersionedConfig> = OnceLock::new();

/// 进程内的配置缓存，每次重新加载都会原子地替换整个配置并递增版本号
pub struct VersionedConfig {
    inner: ArcSwap<Config>,
    update_lock: tokio::sync::Mutex<()>,
}

impl VersionedConfig {
    /// 初始化全局的 `VersionedConfig`，配置文件不存在时写入默认配置
    pub fn init(path: &Path) -> Result<()> {
        let config = match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .is_none_or(|e| e.kind() != std::io::ErrorKind::NotFound)
                {
                    bail!("读取配置文件 {} 失败：{:#}", path.display(), e);
                }
                let config = Config::default();
                config.save(path)?;
                warn!(
                    "配置文件不存在，已在 {} 写入默认配置。生成 auth_token：{}，该信息仅在首次运行时打印",
                    path.display(),
                    config.auth_token
                );
                config
            }
        };
        config.check().context("配置文件不合法，请参考提示信息修复后继续运行")?;
        if config.enabled_sites().next().is_none() {
            warn!("没有配置任何可用的视频源，聚合搜索将始终返回空结果");
        }
        VERSIONED_CONFIG
            .set(VersionedConfig::new(config))
            .map_err(|_| anyhow!("VERSIONED_CONFIG has already been initialized"))?;
        Ok(())
    }

    #[cfg(test)]
    /// 单元测试直接使用测试专用的配置即可
    pub fn get() -> &'static VersionedConfig {
        use std::sync::LazyLock;
        static TEST_CONFIG: LazyLock<VersionedConfig> = LazyLock::new(|| VersionedConfig::new(Config::test_default()));
        &TEST_CONFIG
    }

    #[cfg(not(test))]
    /// 获取全局的 `VersionedConfig`，如果未初始化则会 panic
    pub fn get() -> &'static VersionedConfig {
        VERSIONED_CONFIG.get().expect("VERSIONED_CONFIG is not initialized")
    }

    pub fn new(config: Config) -> Self {
        Self {
            inner: ArcSwap::from_pointee(config),
            update_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn load(&self) -> Guard<Arc<Config>> {
        self.inner.load()
    }

    pub fn load_full(&self) -> Arc<Config> {
        self.inner.load_full()
    }

    pub fn version(&self) -> u64 {
        self.inner.load().version
    }

    /// 从文件重新加载配置，新配置检查不通过时保留旧配置并返回错误
    pub async fn reload(&self, path: &Path) -> Result<Arc<Config>> {
        let _lock = self.update_lock.lock().await;
        let mut new_config = Config::load(path)?;
        new_config.check()?;
        new_config.version = self.inner.load().version + 1;
        let new_config = Arc::new(new_config);
        self.inner.store(new_config.clone());
        Ok(new_config)
    }
}
