//! 弹弹play 开放接口，多个接口地址依次尝试

use anyhow::{Result, bail};
use reqwest::Method;
use serde::Deserialize;

use crate::config::DandanplayOption;
use crate::upstream::Client;
use crate::upstream::error::{ErrorForStatusExt, UpstreamError};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchEpisodesResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    animes: Vec<Anime>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Anime {
    #[serde(default)]
    anime_title: String,
    #[serde(default)]
    episodes: Vec<Episode>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Episode {
    episode_id: i64,
}

#[derive(Deserialize, Debug)]
struct CommentResponse {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Deserialize, Debug)]
struct RawComment {
    cid: i64,
    /// `时间,模式,颜色,用户`
    p: String,
    m: String,
}

fn default_true() -> bool {
    true
}

impl SearchEpisodesResponse {
    /// 只看第一部作品的第一集，第一部作品没有分集时视为未匹配
    fn first_episode(self) -> Option<(String, i64)> {
        let anime = self.animes.into_iter().next()?;
        let episode = anime.episodes.first()?;
        Some((anime.anime_title, episode.episode_id))
    }
}

/// 一条解析后的弹弹play 弹幕
#[derive(Debug, Clone, PartialEq)]
pub struct DandanComment {
    pub cid: i64,
    pub time: f64,
    pub mode: i32,
    pub color: u32,
    pub user: String,
    pub text: String,
}

impl TryFrom<RawComment> for DandanComment {
    type Error = UpstreamError;

    fn try_from(raw: RawComment) -> Result<Self, Self::Error> {
        let invalid = || UpstreamError::InvalidPayload(format!("malformed comment p field: {}", raw.p));
        let mut parts = raw.p.split(',');
        let time = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .ok_or_else(invalid)?;
        let mode = parts.next().and_then(|s| s.trim().parse().ok()).unwrap_or(1);
        let color = parts.next().and_then(|s| s.trim().parse().ok()).unwrap_or(0xFFFFFF);
        let user = parts.next().unwrap_or_default().trim().to_owned();
        Ok(Self {
            cid: raw.cid,
            time,
            mode,
            color,
            user,
            text: raw.m,
        })
    }
}

pub struct Dandanplay<'a> {
    client: &'a Client,
    option: &'a DandanplayOption,
}

impl<'a> Dandanplay<'a> {
    pub fn new(client: &'a Client, option: &'a DandanplayOption) -> Self {
        Self { client, option }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(Method::GET, url).timeout(self.option.timeout());
        if let (Some(app_id), Some(app_secret)) = (&self.option.app_id, &self.option.app_secret) {
            req = req.header("X-AppId", app_id).header("X-AppSecret", app_secret);
        }
        req
    }

    /// 依次尝试每个接口地址，返回第一个成功的结果，全部失败时返回最后一个错误
    pub async fn comments(&self, title: &str, episode: u32) -> Result<Vec<DandanComment>> {
        let mut last_error = None;
        for endpoint in &self.option.endpoints {
            match self.comments_from(endpoint.trim_end_matches('/'), title, episode).await {
                Ok(comments) => return Ok(comments),
                Err(e) => {
                    warn!("弹弹play 接口 {} 请求失败，尝试下一个：{:#}", endpoint, e);
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(UpstreamError::AllEndpointsFailed(self.option.endpoints.len(), format!("{:#}", e)).into()),
            None => bail!("未配置任何弹弹play 接口"),
        }
    }

    async fn comments_from(&self, endpoint: &str, title: &str, episode: u32) -> Result<Vec<DandanComment>> {
        let search = self
            .request(&format!("{endpoint}/api/v2/search/episodes"))
            .query(&[("anime", title)])
            .query(&[("episode", episode)])
            .send()
            .await?
            .error_for_status_ext()?
            .json::<SearchEpisodesResponse>()
            .await?;
        if !search.success {
            return Err(UpstreamError::ErrorResponse(
                search.error_code,
                search.error_message.unwrap_or_default(),
            )
            .into());
        }
        let Some((anime_title, episode_id)) = search.first_episode() else {
            debug!("弹弹play 未匹配到 {} 第 {} 集", title, episode);
            return Ok(Vec::new());
        };
        debug!("弹弹play 匹配到 {} 的分集 {}", anime_title, episode_id);
        let res = self
            .request(&format!("{endpoint}/api/v2/comment/{episode_id}"))
            .query(&[("withRelated", "true"), ("chConvert", "1")])
            .send()
            .await?
            .error_for_status_ext()?
            .json::<CommentResponse>()
            .await?;
        Ok(res
            .comments
            .into_iter()
            .filter_map(|raw| match DandanComment::try_from(raw) {
                Ok(comment) => Some(comment),
                Err(e) => {
                    debug!("跳过无法解析的弹幕：{}", e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comment_p_field() {
        let raw = RawComment {
            cid: 1,
            p: "12.34,5,16711680,[BiliBili]abc".to_owned(),
            m: "前方高能".to_owned(),
        };
        let comment = DandanComment::try_from(raw).unwrap();
        assert_eq!(comment.time, 12.34);
        assert_eq!(comment.mode, 5);
        assert_eq!(comment.color, 0xFF0000);
        assert_eq!(comment.user, "[BiliBili]abc");

        let raw = RawComment {
            cid: 2,
            p: "3".to_owned(),
            m: "短格式".to_owned(),
        };
        let comment = DandanComment::try_from(raw).unwrap();
        assert_eq!((comment.mode, comment.color), (1, 0xFFFFFF));

        let raw = RawComment {
            cid: 3,
            p: "abc,1,0,u".to_owned(),
            m: "坏数据".to_owned(),
        };
        assert!(DandanComment::try_from(raw).is_err());
    }

    #[test]
    fn test_search_response_deserialize() {
        let res: SearchEpisodesResponse = serde_json::from_str(
            r#"{"hasMore":false,"animes":[{"animeId":1,"animeTitle":"葬送的芙莉莲","type":"tvseries",
            "episodes":[{"episodeId":178460001,"episodeTitle":"第1话"}]}],"errorCode":0,"success":true,"errorMessage":""}"#,
        )
        .unwrap();
        assert!(res.success);
        assert_eq!(res.animes[0].episodes[0].episode_id, 178460001);
        assert_eq!(
            res.first_episode(),
            Some(("葬送的芙莉莲".to_owned(), 178460001))
        );
    }

    #[test]
    fn test_first_episode_only_looks_at_first_anime() {
        let res: SearchEpisodesResponse = serde_json::from_str(
            r#"{"success":true,"animes":[
                {"animeTitle":"没有分集","episodes":[]},
                {"animeTitle":"第二部","episodes":[{"episodeId":2}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(res.first_episode(), None);
        let res: SearchEpisodesResponse = serde_json::from_str(r#"{"animes":[]}"#).unwrap();
        assert_eq!(res.first_episode(), None);
    }

    #[tokio::test]
    async fn test_all_endpoints_failed() {
        let client = Client::new().unwrap();
        let option = DandanplayOption {
            // 保留地址，连接会立即失败
            endpoints: vec!["http://127.0.0.1:1".to_owned(), "http://127.0.0.1:2".to_owned()],
            timeout: 1,
            ..Default::default()
        };
        let err = Dandanplay::new(&client, &option).comments("测试", 1).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UpstreamError>(),
            Some(UpstreamError::AllEndpointsFailed(2, _))
        ));
    }

    #[ignore = "only for manual test"]
    #[tokio::test]
    async fn test_fetch_real_comments() {
        let client = Client::new().unwrap();
        let option = DandanplayOption::default();
        let comments = Dandanplay::new(&client, &option).comments("葬送的芙莉莲", 1).await.unwrap();
        assert!(!comments.is_empty());
    }
}
