use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::ARGS;
use crate::config::default::{default_auth_token, default_bind_address, default_site_name};
use crate::config::item::{
    AiOption, ApiSite, DanmakuOption, DoubanOption, NetdiskOption, SearchOption, YoutubeOption,
};

pub static CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    ARGS.config_dir
        .clone()
        .unwrap_or_else(|| dirs::config_dir().expect("No config path found").join("vidhub"))
});

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_auth_token")]
    pub auth_token: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub api_sites: Vec<ApiSite>,
    #[serde(default)]
    pub search: SearchOption,
    #[serde(default)]
    pub danmaku: DanmakuOption,
    #[serde(default)]
    pub douban: DoubanOption,
    #[serde(default)]
    pub netdisk: NetdiskOption,
    #[serde(default)]
    pub youtube: YoutubeOption,
    #[serde(default)]
    pub ai: AiOption,
    /// 仅在内存中使用，每次重新加载配置时递增
    #[serde(skip)]
    pub version: u64,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).with_context(|| format!("解析配置文件 {} 失败", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// 未被禁用的视频源，保持配置中的顺序
    pub fn enabled_sites(&self) -> impl Iterator<Item = &ApiSite> {
        self.api_sites.iter().filter(|site| !site.disabled)
    }

    pub fn find_site(&self, key: &str) -> Option<&ApiSite> {
        self.enabled_sites().find(|site| site.key == key)
    }

    pub fn check(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.auth_token.is_empty() {
            errors.push("auth_token 不能为空".to_owned());
        }
        if self.bind_address.is_empty() {
            errors.push("bind_address 不能为空".to_owned());
        }
        let mut keys = HashSet::new();
        for site in &self.api_sites {
            if site.key.is_empty() {
                errors.push(format!("视频源 {} 的 key 不能为空", site.name));
            } else if !keys.insert(site.key.as_str()) {
                errors.push(format!("视频源 key {} 重复", site.key));
            }
            if !(site.api.starts_with("http://") || site.api.starts_with("https://")) {
                errors.push(format!("视频源 {} 的 api 应为 http(s) 地址", site.key));
            }
        }
        if self.search.timeout == 0 {
            errors.push("search.timeout 必须大于 0".to_owned());
        }
        if self.search.max_page == 0 {
            errors.push("search.max_page 必须大于 0".to_owned());
        }
        if self.danmaku.enabled {
            if self.danmaku.dandanplay.endpoints.is_empty() {
                errors.push("启用弹幕时至少需要配置一个 dandanplay 接口".to_owned());
            }
            if self.danmaku.dandanplay.timeout == 0 {
                errors.push("danmaku.dandanplay.timeout 必须大于 0".to_owned());
            }
        }
        if self.douban.timeout == 0 {
            errors.push("douban.timeout 必须大于 0".to_owned());
        }
        if self.netdisk.enabled && self.netdisk.api.is_empty() {
            errors.push("启用网盘搜索时必须配置 netdisk.api".to_owned());
        }
        if self.youtube.enabled {
            if self.youtube.api_key.is_empty() {
                errors.push("启用 YouTube 搜索时必须配置 youtube.api_key".to_owned());
            }
            if self.youtube.timeout == 0 {
                errors.push("youtube.timeout 必须大于 0".to_owned());
            }
        }
        if self.ai.enabled && (self.ai.api.is_empty() || self.ai.api_key.is_empty() || self.ai.model.is_empty()) {
            errors.push("启用 AI 推荐时必须配置 ai.api、ai.api_key 与 ai.model".to_owned());
        }
        if !errors.is_empty() {
            bail!(
                errors
                    .into_iter()
                    .map(|e| format!("- {}", e))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }
        Ok(())
    }

    #[cfg(test)]
    pub(super) fn test_default() -> Self {
        Self {
            auth_token: "test-token".to_owned(),
            api_sites: vec![ApiSite {
                key: "test".to_owned(),
                name: "测试源".to_owned(),
                api: "https://example.com/api.php/provide/vod".to_owned(),
                detail: None,
                disabled: false,
            }],
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_token: default_auth_token(),
            bind_address: default_bind_address(),
            site_name: default_site_name(),
            api_sites: Vec::new(),
            search: SearchOption::default(),
            danmaku: DanmakuOption::default(),
            douban: DoubanOption::default(),
            netdisk: NetdiskOption::default(),
            youtube: YoutubeOption::default(),
            ai: AiOption::default(),
            version: 0,
        }
    }
}
