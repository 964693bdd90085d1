use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::default::{default_ai_system_prompt, default_blocked_words, default_dandanplay_endpoints};

/// 一个兼容苹果 CMS 接口的视频源
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiSite {
    /// 视频源的唯一标识，会出现在搜索结果的 source 字段中
    pub key: String,
    pub name: String,
    pub api: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// 聚合搜索相关的配置
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchOption {
    /// 单个视频源的超时时间，单位为秒
    pub timeout: u64,
    /// 单个视频源最多拉取的页数
    pub max_page: u32,
    pub content_filter: ContentFilter,
}

impl SearchOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for SearchOption {
    fn default() -> Self {
        Self {
            timeout: 15,
            max_page: 5,
            content_filter: ContentFilter::default(),
        }
    }
}

/// 按分类名过滤搜索结果
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ContentFilter {
    pub enabled: bool,
    pub blocked_words: Vec<String>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            blocked_words: default_blocked_words(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DanmakuOption {
    /// 关闭后只返回本地存储的弹幕
    pub enabled: bool,
    pub dandanplay: DandanplayOption,
}

impl Default for DanmakuOption {
    fn default() -> Self {
        Self {
            enabled: true,
            dandanplay: DandanplayOption::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DandanplayOption {
    /// 按顺序尝试的接口地址，前一个失败时使用下一个
    pub endpoints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
    pub timeout: u64,
}

impl DandanplayOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for DandanplayOption {
    fn default() -> Self {
        Self {
            endpoints: default_dandanplay_endpoints(),
            app_id: None,
            app_secret: None,
            timeout: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DoubanOption {
    /// 两次豆瓣请求之间的最小间隔，单位为毫秒
    pub request_interval: u64,
    pub timeout: u64,
}

impl DoubanOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for DoubanOption {
    fn default() -> Self {
        Self {
            request_interval: 2000,
            timeout: 10,
        }
    }
}

/// 网盘搜索（PanSou 兼容接口）
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetdiskOption {
    pub enabled: bool,
    pub api: String,
    pub cloud_types: Vec<String>,
    pub timeout: u64,
}

impl NetdiskOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for NetdiskOption {
    fn default() -> Self {
        Self {
            enabled: false,
            api: String::new(),
            cloud_types: Vec::new(),
            timeout: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct YoutubeOption {
    pub enabled: bool,
    pub api: String,
    pub api_key: String,
    pub region_code: String,
    pub max_results: u32,
    pub timeout: u64,
}

impl YoutubeOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for YoutubeOption {
    fn default() -> Self {
        Self {
            enabled: false,
            api: "https://www.googleapis.com/youtube/v3".to_owned(),
            api_key: String::new(),
            region_code: "US".to_owned(),
            max_results: 24,
            timeout: 15,
        }
    }
}

/// OpenAI 兼容的对话接口，用于影视推荐
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AiOption {
    pub enabled: bool,
    pub api: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub timeout: u64,
}

impl AiOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for AiOption {
    fn default() -> Self {
        Self {
            enabled: false,
            api: "https://api.openai.com/v1".to_owned(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_owned(),
            temperature: 0.7,
            max_tokens: 3000,
            system_prompt: default_ai_system_prompt(),
            timeout: 60,
        }
    }
}
