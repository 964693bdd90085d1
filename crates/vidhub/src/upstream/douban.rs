//! 豆瓣：详情页通过正则抓取，榜单使用移动端 rexxar 接口

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::config::DoubanOption;
use crate::upstream::HubClient;
use crate::upstream::error::{ErrorForStatusExt, UpstreamError};

macro_rules! regex {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect(concat!("invalid regex ", $re)));
    };
}

regex!(TITLE, r#"<span property="v:itemreviewed">([^<]+)</span>"#);
regex!(YEAR, r#"<span class="year">\((\d{4})\)</span>"#);
regex!(RATE, r#"<strong[^>]*property="v:average"[^>]*>([^<]*)</strong>"#);
regex!(GENRE, r#"<span property="v:genre">([^<]+)</span>"#);
regex!(DIRECTOR, r#"<a[^>]*rel="v:directedBy"[^>]*>([^<]+)</a>"#);
regex!(CAST, r#"<a[^>]*rel="v:starring"[^>]*>([^<]+)</a>"#);
regex!(COUNTRY, r#"<span class="pl">制片国家/地区:</span>\s*([^<]+)"#);
regex!(EPISODES, r#"<span class="pl">集数:</span>\s*(\d+)"#);
regex!(RUNTIME, r#"<span property="v:runtime"[^>]*>([^<]+)</span>"#);
regex!(POSTER, r#"<img src="([^"]+)" title="点击看更多海报""#);
regex!(SUMMARY, r#"(?s)<span property="v:summary"[^>]*>(.*?)</span>"#);
regex!(BR, r#"<br\s*/?>"#);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DoubanDetails {
    pub id: String,
    pub title: String,
    pub year: String,
    pub rate: String,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub cast: Vec<String>,
    pub countries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    pub poster: String,
    pub summary: String,
}

#[derive(Deserialize, Debug)]
struct RecentHotResponse {
    #[serde(default)]
    items: Vec<RecentHotItem>,
}

#[derive(Deserialize, Debug)]
struct RecentHotItem {
    id: String,
    title: String,
    #[serde(default)]
    card_subtitle: String,
    rating: Option<RecentHotRating>,
    pic: Option<RecentHotPic>,
}

#[derive(Deserialize, Debug)]
struct RecentHotRating {
    value: f64,
}

#[derive(Deserialize, Debug)]
struct RecentHotPic {
    #[serde(default)]
    normal: String,
}

/// 榜单中的一个条目
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DoubanItem {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub rate: String,
    pub year: String,
}

impl From<RecentHotItem> for DoubanItem {
    fn from(item: RecentHotItem) -> Self {
        // card_subtitle 形如 "2024 / 中国大陆 / 剧情"
        let year = item
            .card_subtitle
            .split('/')
            .next()
            .map(str::trim)
            .filter(|s| s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or_default()
            .to_owned();
        Self {
            id: item.id,
            title: item.title,
            poster: item.pic.map(|pic| pic.normal).unwrap_or_default(),
            rate: item
                .rating
                .filter(|r| r.value > 0.0)
                .map(|r| format!("{:.1}", r.value))
                .unwrap_or_default(),
            year,
        }
    }
}

pub struct Douban<'a> {
    client: &'a HubClient,
    option: &'a DoubanOption,
}

impl<'a> Douban<'a> {
    pub fn new(client: &'a HubClient, option: &'a DoubanOption) -> Self {
        Self { client, option }
    }

    pub async fn details(&self, id: &str) -> Result<DoubanDetails> {
        let html = self
            .client
            .douban_request(Method::GET, &format!("https://movie.douban.com/subject/{id}/"))
            .await
            .timeout(self.option.timeout())
            .send()
            .await?
            .error_for_status_ext()?
            .text()
            .await?;
        Ok(parse_details(id, &html).ok_or_else(|| UpstreamError::NotFound(format!("豆瓣条目 {id}")))?)
    }

    /// 最近热门的电影或剧集，`kind` 为 movie 或 tv
    pub async fn recent_hot(
        &self,
        kind: &str,
        category: &str,
        r#type: &str,
        start: u32,
        limit: u32,
    ) -> Result<Vec<DoubanItem>> {
        let res = self
            .client
            .douban_request(
                Method::GET,
                &format!("https://m.douban.com/rexxar/api/v2/subject/recent_hot/{kind}"),
            )
            .await
            .timeout(self.option.timeout())
            .query(&[("category", category), ("type", r#type)])
            .query(&[("start", start), ("limit", limit)])
            .send()
            .await?
            .error_for_status_ext()?
            .json::<RecentHotResponse>()
            .await?;
        Ok(res.items.into_iter().map(DoubanItem::from).collect())
    }
}

fn capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
}

fn capture_all(re: &Regex, html: &str) -> Vec<String> {
    re.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .collect()
}

/// 从条目详情页中抽取信息，页面中找不到标题时认为条目不存在
pub(crate) fn parse_details(id: &str, html: &str) -> Option<DoubanDetails> {
    let title = capture(&TITLE, html)?;
    let summary = capture(&SUMMARY, html)
        .map(|s| {
            BR.replace_all(&s, "\n")
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();
    Some(DoubanDetails {
        id: id.to_owned(),
        title,
        year: capture(&YEAR, html).unwrap_or_default(),
        rate: capture(&RATE, html).unwrap_or_default(),
        genres: capture_all(&GENRE, html),
        directors: capture_all(&DIRECTOR, html),
        cast: capture_all(&CAST, html),
        countries: capture(&COUNTRY, html)
            .map(|s| s.split('/').map(|c| c.trim().to_owned()).filter(|c| !c.is_empty()).collect())
            .unwrap_or_default(),
        episodes: capture(&EPISODES, html).and_then(|s| s.parse().ok()),
        runtime: capture(&RUNTIME, html),
        poster: capture(&POSTER, html).unwrap_or_default(),
        summary,
    })
}
