//! 苹果 CMS（MacCMS）风格的视频源接口

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::ApiSite;
use crate::upstream::Client;
use crate::upstream::error::{ErrorForStatusExt, UpstreamError};

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("invalid year regex"));
static HTML_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid html tag regex"));

/// 单个视频源返回的一条搜索结果
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub episodes: Vec<String>,
    pub episodes_titles: Vec<String>,
    pub source: String,
    pub source_name: String,
    pub class: String,
    pub year: String,
    pub desc: String,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub douban_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct VodList {
    #[serde(default, deserialize_with = "lenient_u32")]
    pagecount: u32,
    #[serde(default)]
    list: Vec<VodItem>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct VodItem {
    #[serde(deserialize_with = "lenient_string")]
    vod_id: String,
    #[serde(deserialize_with = "lenient_string")]
    vod_name: String,
    #[serde(deserialize_with = "lenient_string")]
    vod_pic: String,
    #[serde(deserialize_with = "lenient_string")]
    vod_play_url: String,
    vod_class: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    vod_year: String,
    vod_content: Option<String>,
    type_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    vod_douban_id: String,
}

impl VodItem {
    fn into_search_result(self, site: &ApiSite) -> SearchResult {
        let (episodes_titles, episodes) = parse_play_url(&self.vod_play_url);
        SearchResult {
            id: self.vod_id,
            title: normalize_title(&self.vod_name),
            poster: self.vod_pic.trim().to_owned(),
            episodes,
            episodes_titles,
            source: site.key.clone(),
            source_name: site.name.clone(),
            class: self.vod_class.unwrap_or_default(),
            year: parse_year(&self.vod_year),
            desc: strip_html(self.vod_content.as_deref().unwrap_or_default()),
            type_name: self.type_name.unwrap_or_default(),
            douban_id: Some(self.vod_douban_id).filter(|id| !id.is_empty() && id != "0"),
        }
    }
}

pub struct ApiSiteClient<'a> {
    client: &'a Client,
    site: &'a ApiSite,
    timeout: Duration,
}

impl<'a> ApiSiteClient<'a> {
    /// timeout 作用于每一次请求
    pub fn new(client: &'a Client, site: &'a ApiSite, timeout: Duration) -> Self {
        Self { client, site, timeout }
    }

    async fn get_list(&self, params: Vec<(&str, &str)>) -> Result<VodList> {
        let list = self
            .client
            .request(Method::GET, &self.site.api)
            .query(&[("ac", "videolist")])
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status_ext()?
            .json::<VodList>()
            .await?;
        Ok(list)
    }

    /// 搜索关键词，首页声明有更多页时并发拉取剩余页（不超过 max_page）
    pub async fn search(&self, query: &str, max_page: u32) -> Result<Vec<SearchResult>> {
        let first_page = self.get_list(vec![("wd", query)]).await?;
        let page_count = first_page.pagecount.min(max_page);
        let mut items = first_page.list;
        if page_count > 1 {
            let pages = (2..=page_count).map(|page| page.to_string()).collect::<Vec<_>>();
            let rest = join_all(
                pages
                    .iter()
                    .map(|page| self.get_list(vec![("wd", query), ("pg", page.as_str())])),
            )
            .await;
            for (page, res) in pages.iter().zip(rest) {
                match res {
                    Ok(list) => items.extend(list.list),
                    Err(e) => warn!("视频源 {} 第 {} 页搜索失败，已跳过：{:#}", self.site.name, page, e),
                }
            }
        }
        Ok(items
            .into_iter()
            .map(|item| item.into_search_result(self.site))
            .collect())
    }

    pub async fn detail(&self, id: &str) -> Result<SearchResult> {
        let list = self.get_list(vec![("ids", id)]).await?;
        let item = list
            .list
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::NotFound(format!("{} 中不存在视频 {}", self.site.name, id)))?;
        Ok(item.into_search_result(self.site))
    }
}

/// 解析 vod_play_url，返回播放地址最多的一组 (分集标题, m3u8 地址)
///
/// 格式为 `第1集$url1#第2集$url2$$$另一个播放源...`
pub(crate) fn parse_play_url(play_url: &str) -> (Vec<String>, Vec<String>) {
    let mut best: (Vec<String>, Vec<String>) = (Vec::new(), Vec::new());
    for source in play_url.split("$$$") {
        let (titles, urls): (Vec<String>, Vec<String>) = source
            .split('#')
            .filter_map(|entry| {
                let (title, url) = entry.split_once('$')?;
                let url = url.trim();
                (!url.contains('$') && url.ends_with(".m3u8")).then(|| (title.trim().to_owned(), url.to_owned()))
            })
            .unzip();
        if urls.len() > best.1.len() {
            best = (titles, urls);
        }
    }
    best
}

fn parse_year(raw: &str) -> String {
    YEAR_REGEX
        .find(raw)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_html(raw: &str) -> String {
    HTML_TAG_REGEX
        .replace_all(raw, "")
        .replace("&nbsp;", " ")
        .trim()
        .to_owned()
}

/// 不同站点对同一字段可能返回字符串、数字或 null
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        serde_json::Value::Number(n) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32).unwrap_or_default(),
        _ => 0,
    })
}
