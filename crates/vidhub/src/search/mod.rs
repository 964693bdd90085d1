//! 多视频源的聚合搜索：并发请求、过滤、去重、排序与分页

use std::cmp::Ordering;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use itertools::Itertools;
use serde::Serialize;

use crate::config::{ApiSite, ContentFilter};
use crate::upstream::{ApiSiteClient, Client, SearchResult};

pub const DEFAULT_LIMIT: u32 = 20;

/// 可以被聚合搜索的单个视频源
pub trait SiteSearcher {
    fn name(&self) -> &str;

    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchResult>>> + Send;
}

/// 通过苹果 CMS 接口搜索的视频源
pub struct HttpSiteSearcher<'a> {
    client: &'a Client,
    site: &'a ApiSite,
    max_page: u32,
    timeout: Duration,
}

impl<'a> HttpSiteSearcher<'a> {
    pub fn new(client: &'a Client, site: &'a ApiSite, max_page: u32, timeout: Duration) -> Self {
        Self {
            client,
            site,
            max_page,
            timeout,
        }
    }
}

impl SiteSearcher for HttpSiteSearcher<'_> {
    fn name(&self) -> &str {
        &self.site.name
    }

    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchResult>>> + Send {
        let client = ApiSiteClient::new(self.client, self.site, self.timeout);
        let max_page = self.max_page;
        let query = query.to_owned();
        async move { client.search(&query, max_page).await }
    }
}

/// 并发搜索所有视频源，每个视频源单独计时
///
/// 超时或出错的视频源不贡献任何结果，返回值按视频源的顺序拼接
pub async fn fan_out<S: SiteSearcher + Sync>(searchers: &[S], query: &str, timeout: Duration) -> Vec<SearchResult> {
    let tasks = searchers.iter().map(|searcher| async move {
        match tokio::time::timeout(timeout, searcher.search(query)).await {
            Ok(Ok(results)) => {
                debug!("视频源 {} 返回 {} 条结果", searcher.name(), results.len());
                results
            }
            Ok(Err(e)) => {
                warn!("视频源 {} 搜索「{}」失败：{:#}", searcher.name(), query, e);
                Vec::new()
            }
            Err(_) => {
                warn!("视频源 {} 搜索「{}」超过 {:?} 未返回，已忽略", searcher.name(), query, timeout);
                Vec::new()
            }
        }
    });
    join_all(tasks).await.into_iter().flatten().collect()
}

/// 丢弃没有可播放分集的结果，启用内容过滤时丢弃分类命中屏蔽词的结果
pub fn filter_results(results: Vec<SearchResult>, filter: &ContentFilter) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|r| !r.episodes.is_empty())
        .filter(|r| {
            !filter.enabled
                || !filter
                    .blocked_words
                    .iter()
                    .filter(|w| !w.is_empty())
                    .any(|w| r.type_name.contains(w.as_str()) || r.class.contains(w.as_str()))
        })
        .collect()
}

/// 按标题去重，保留第一次出现的结果
pub fn dedup_by_title(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results.into_iter().filter(|r| seen.insert(r.title.clone())).collect()
}

/// 年份倒序，unknown 排在最后，同年份时标题短的在前
fn compare(year_a: &str, title_a: &str, year_b: &str, title_b: &str) -> Ordering {
    let year = |y: &str| y.parse::<u32>().ok();
    match (year(year_a), year(year_b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| title_a.chars().count().cmp(&title_b.chars().count()))
}

pub fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| compare(&a.year, &a.title, &b.year, &b.title));
}

/// 页码从 1 开始，超出总数的页返回空
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Vec<T> {
    let skip = (page.max(1) as usize - 1).saturating_mul(limit as usize);
    items.into_iter().skip(skip).take(limit as usize).collect()
}

#[derive(Serialize, Debug)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

/// 平铺视图：去重、排序后分页
pub fn flat_view(results: Vec<SearchResult>, page: u32, limit: u32) -> SearchPage {
    let mut results = dedup_by_title(results);
    sort_results(&mut results);
    let total = results.len();
    SearchPage {
        results: paginate(results, page, limit),
        total,
        page,
        limit,
    }
}

/// 聚合视图中的一组：不同视频源中的同一部作品
#[derive(Serialize, Debug)]
pub struct AggregatedResult {
    pub key: String,
    pub title: String,
    pub year: String,
    pub r#type: &'static str,
    pub sources: Vec<SearchResult>,
}

fn media_type(result: &SearchResult) -> &'static str {
    if result.episodes.len() == 1 { "movie" } else { "tv" }
}

fn aggregate_key(result: &SearchResult) -> String {
    let normalized_title = result
        .title
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    format!("{}-{}-{}", normalized_title, result.year, media_type(result))
}

/// 聚合视图：按「标题-年份-类型」分组，组内保持原有顺序
pub fn aggregate(results: Vec<SearchResult>) -> Vec<AggregatedResult> {
    let mut groups = results
        .into_iter()
        .into_group_map_by(aggregate_key)
        .into_iter()
        .filter_map(|(key, sources)| {
            let first = sources.first()?;
            Some(AggregatedResult {
                title: first.title.clone(),
                year: first.year.clone(),
                r#type: media_type(first),
                key,
                sources,
            })
        })
        .collect::<Vec<_>>();
    // HashMap 的遍历顺序不固定，先按 key 排序保证结果稳定
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups.sort_by(|a, b| compare(&a.year, &a.title, &b.year, &b.title));
    groups
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use anyhow::anyhow;

    use super::*;

    struct FakeSearcher {
        name: &'static str,
        delay: Duration,
        results: Result<Vec<SearchResult>, &'static str>,
    }

    impl SiteSearcher for FakeSearcher {
        fn name(&self) -> &str {
            self.name
        }

        fn search(&self, _query: &str) -> impl Future<Output = Result<Vec<SearchResult>>> + Send {
            let delay = self.delay;
            let results = self.results.clone().map_err(|e| anyhow!(e));
            async move {
                tokio::time::sleep(delay).await;
                results
            }
        }
    }

    fn result(source: &str, title: &str, year: &str, episodes: usize) -> SearchResult {
        SearchResult {
            id: format!("{source}-{title}"),
            title: title.to_owned(),
            poster: String::new(),
            episodes: (1..=episodes).map(|i| format!("https://cdn.example/{i}.m3u8")).collect(),
            episodes_titles: (1..=episodes).map(|i| format!("第{i}集")).collect(),
            source: source.to_owned(),
            source_name: source.to_owned(),
            class: String::new(),
            year: year.to_owned(),
            desc: String::new(),
            type_name: "电影".to_owned(),
            douban_id: None,
        }
    }

    #[tokio::test]
    async fn test_fan_out_ignores_failed_and_slow_sites() {
        let searchers = [
            FakeSearcher {
                name: "a",
                delay: Duration::from_millis(10),
                results: Ok(vec![result("a", "三体", "2023", 30)]),
            },
            FakeSearcher {
                name: "slow",
                delay: Duration::from_secs(30),
                results: Ok(vec![result("slow", "三体", "2023", 30)]),
            },
            FakeSearcher {
                name: "broken",
                delay: Duration::ZERO,
                results: Err("connection reset"),
            },
            FakeSearcher {
                name: "b",
                delay: Duration::from_millis(50),
                results: Ok(vec![result("b", "三体 第二季", "unknown", 1)]),
            },
        ];
        let start = Instant::now();
        let results = fan_out(&searchers, "三体", Duration::from_millis(300)).await;
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(
            results.iter().map(|r| r.source.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_filter_results() {
        let mut blocked = result("a", "不该出现", "2020", 1);
        blocked.type_name = "伦理片".to_owned();
        let mut blocked_by_class = result("a", "也不该出现", "2020", 1);
        blocked_by_class.class = "福利,剧情".to_owned();
        let no_episode = result("a", "没有分集", "2020", 0);
        let normal = result("a", "正常", "2020", 1);
        let results = vec![blocked, blocked_by_class, no_episode, normal];

        let filter = ContentFilter::default();
        let filtered = filter_results(results.clone(), &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "正常");

        let disabled = ContentFilter {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(filter_results(results, &disabled).len(), 3);
    }

    #[test]
    fn test_flat_view_dedup_and_sort() {
        let results = vec![
            result("a", "流浪地球", "2019", 1),
            result("b", "流浪地球", "2019", 1),
            result("a", "未知年份", "unknown", 1),
            result("b", "流浪地球2", "2023", 1),
            result("c", "流浪地球 导演剪辑版", "2019", 1),
            result("c", "2023 长标题的作品", "2023", 1),
        ];
        let page = flat_view(results, 1, 20);
        assert_eq!(page.total, 5);
        assert_eq!(
            page.results.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["流浪地球2", "2023 长标题的作品", "流浪地球", "流浪地球 导演剪辑版", "未知年份"]
        );
        assert_eq!(page.results[2].source, "a");
        let titles = page.results.iter().map(|r| &r.title).collect::<HashSet<_>>();
        assert_eq!(titles.len(), page.results.len());
    }

    #[test]
    fn test_paginate() {
        let items = (1..=45).collect::<Vec<_>>();
        assert_eq!(paginate(items.clone(), 1, 20), (1..=20).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), 3, 20), (41..=45).collect::<Vec<_>>());
        assert!(paginate(items.clone(), 4, 20).is_empty());
        assert!(paginate(items.clone(), u32::MAX, 100).is_empty());
        // 页码 0 视为第一页
        assert_eq!(paginate(items, 0, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_aggregate_groups_sources() {
        let results = vec![
            result("a", "狂飙", "2023", 39),
            result("b", "狂 飙", "2023", 39),
            result("c", "狂飙", "2023", 1),
            result("a", "甄嬛传", "2011", 76),
        ];
        let groups = aggregate(results);
        assert_eq!(groups.len(), 3);
        let tv = groups.iter().find(|g| g.key == "狂飙-2023-tv").unwrap();
        assert_eq!(tv.sources.len(), 2);
        assert_eq!(tv.sources[0].source, "a");
        let movie = groups.iter().find(|g| g.key == "狂飙-2023-movie").unwrap();
        assert_eq!(movie.r#type, "movie");
        assert_eq!(groups.last().unwrap().title, "甄嬛传");
    }
}
