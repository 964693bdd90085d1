use anyhow::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::config::YoutubeOption;
use crate::upstream::Client;
use crate::upstream::error::ErrorForStatusExt;

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct YoutubeVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
    pub thumbnail: String,
}

impl SearchItem {
    /// 即使指定了 type=video，偶尔也会混入频道或播放列表，这里直接丢弃
    fn into_video(self) -> Option<YoutubeVideo> {
        let id = self.id.video_id?;
        let thumbnails = self.snippet.thumbnails;
        let thumbnail = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();
        Some(YoutubeVideo {
            id,
            title: self.snippet.title,
            description: self.snippet.description,
            channel_title: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            thumbnail,
        })
    }
}

pub struct Youtube<'a> {
    client: &'a Client,
    option: &'a YoutubeOption,
}

impl<'a> Youtube<'a> {
    pub fn new(client: &'a Client, option: &'a YoutubeOption) -> Self {
        Self { client, option }
    }

    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<YoutubeVideo>> {
        let res = self
            .client
            .request(
                Method::GET,
                &format!("{}/search", self.option.api.trim_end_matches('/')),
            )
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("regionCode", self.option.region_code.as_str()),
                ("key", self.option.api_key.as_str()),
            ])
            .query(&[("maxResults", max_results)])
            .timeout(self.option.timeout())
            .send()
            .await?
            .error_for_status_ext()?
            .json::<SearchResponse>()
            .await?;
        Ok(res.items.into_iter().filter_map(SearchItem::into_video).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_search_response_convert() {
        let res: SearchResponse = serde_json::from_str(
            r#"{"kind":"youtube#searchListResponse","items":[
                {"id":{"kind":"youtube#video","videoId":"dQw4w9WgXcQ"},
                 "snippet":{"title":"Never Gonna Give You Up","description":"official","channelTitle":"Rick Astley",
                 "publishedAt":"2009-10-25T06:57:33Z","thumbnails":{"medium":{"url":"https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg"}}}},
                {"id":{"kind":"youtube#channel","channelId":"UC123"},"snippet":{"title":"频道"}}
            ]}"#,
        )
        .unwrap();
        let videos = res.items.into_iter().filter_map(SearchItem::into_video).collect::<Vec<_>>();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "dQw4w9WgXcQ");
        assert_eq!(videos[0].channel_title, "Rick Astley");
        assert!(videos[0].thumbnail.ends_with("mqdefault.jpg"));
    }

    #[tokio::test]
    async fn test_search_respects_timeout() {
        // 只接受连接不返回响应的接口
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut conns = Vec::new();
            while let Ok((conn, _)) = listener.accept().await {
                conns.push(conn);
            }
        });
        let client = Client::new().unwrap();
        let option = YoutubeOption {
            enabled: true,
            api: format!("http://{addr}/youtube/v3/"),
            api_key: "key".to_owned(),
            timeout: 1,
            ..Default::default()
        };
        let start = std::time::Instant::now();
        let res = Youtube::new(&client, &option).search("rust", 5).await;
        assert!(res.is_err());
        assert!(start.elapsed() < Duration::from_secs(5));
        server.abort();
    }
}
