//! 弹幕：本地存储与弹弹play 的合并

pub mod store;

use float_ord::FloatOrd;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use vidhub_entity::danmaku;

use crate::config::DanmakuOption;
use crate::upstream::{Client, DandanComment, Dandanplay};

pub const TYPE_SCROLL: i32 = 0;
pub const TYPE_TOP: i32 = 1;
pub const TYPE_BOTTOM: i32 = 2;

pub const DEFAULT_COLOR: &str = "#FFFFFF";

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Danmaku {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub time: f64,
    pub text: String,
    pub color: String,
    pub r#type: i32,
    /// 毫秒时间戳，第三方弹幕没有发送时间，固定为 0
    pub create_time: i64,
}

/// 同一视频同一集的弹幕共用的标识
pub fn video_id(source: &str, title: &str, episode: u32) -> String {
    let title = title.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    format!("{source}_{title}_{episode}")
}

impl From<danmaku::Model> for Danmaku {
    fn from(model: danmaku::Model) -> Self {
        Self {
            id: model.id.to_string(),
            video_id: model.video_id,
            user_id: model.user_id,
            time: model.time,
            text: model.text,
            color: model.color,
            r#type: model.r#type,
            create_time: model.created_at.and_utc().timestamp_millis(),
        }
    }
}

impl Danmaku {
    fn from_dandanplay(comment: DandanComment, video_id: &str) -> Self {
        // 弹弹play 的模式沿用 B 站：4 底部，5 顶部，其余为滚动
        let r#type = match comment.mode {
            4 => TYPE_BOTTOM,
            5 => TYPE_TOP,
            _ => TYPE_SCROLL,
        };
        Self {
            id: format!("dandanplay_{}", comment.cid),
            video_id: video_id.to_owned(),
            user_id: comment.user,
            time: comment.time,
            text: comment.text,
            color: format!("#{:06X}", comment.color & 0xFFFFFF),
            r#type,
            create_time: 0,
        }
    }
}

/// 拼接后按时间稳定排序，两个来源中重复的弹幕不做合并
pub fn merge_by_time(local: Vec<Danmaku>, remote: Vec<Danmaku>) -> Vec<Danmaku> {
    let mut merged = local;
    merged.extend(remote);
    merged.sort_by_key(|d| FloatOrd(d.time));
    merged
}

/// 同时查询本地与弹弹play，任意一侧失败都只记录日志并视为空
pub async fn fetch_merged(
    db: &DatabaseConnection,
    client: &Client,
    option: &DanmakuOption,
    source: &str,
    title: &str,
    episode: u32,
) -> Vec<Danmaku> {
    let video_id = video_id(source, title, episode);
    let local = async {
        match store::list(db, &video_id).await {
            Ok(models) => models.into_iter().map(Danmaku::from).collect(),
            Err(e) => {
                warn!("读取 {} 的本地弹幕失败：{:#}", video_id, e);
                Vec::new()
            }
        }
    };
    let remote = async {
        if !option.enabled {
            return Vec::new();
        }
        match Dandanplay::new(client, &option.dandanplay).comments(title, episode).await {
            Ok(comments) => comments
                .into_iter()
                .map(|c| Danmaku::from_dandanplay(c, &video_id))
                .collect(),
            Err(e) => {
                warn!("获取 {} 第 {} 集的弹弹play 弹幕失败：{:#}", title, episode, e);
                Vec::new()
            }
        }
    };
    let (local, remote): (Vec<Danmaku>, Vec<Danmaku>) = tokio::join!(local, remote);
    debug!("{} 共有 {} 条本地弹幕，{} 条弹弹play 弹幕", video_id, local.len(), remote.len());
    merge_by_time(local, remote)
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use vidhub_migration::{Migrator, MigratorTrait};

    use super::*;
    use crate::danmaku::store::NewDanmaku;

    fn danmaku(id: &str, time: f64) -> Danmaku {
        Danmaku {
            id: id.to_owned(),
            video_id: "a_b_1".to_owned(),
            user_id: String::new(),
            time,
            text: id.to_owned(),
            color: DEFAULT_COLOR.to_owned(),
            r#type: TYPE_SCROLL,
            create_time: 0,
        }
    }

    #[test]
    fn test_video_id() {
        assert_eq!(video_id("dytt", " 流浪 地球\t2 ", 3), "dytt_流浪地球2_3");
    }

    #[test]
    fn test_merge_by_time_keeps_duplicates_and_order() {
        let local = vec![danmaku("l1", 1.0), danmaku("l2", 5.5), danmaku("l3", 10.0)];
        let remote = vec![danmaku("r1", 0.5), danmaku("r2", 5.5), danmaku("r3", 7.25)];
        let merged = merge_by_time(local, remote);
        assert_eq!(
            merged.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            vec!["r1", "l1", "l2", "r2", "r3", "l3"]
        );
        assert!(merged.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_from_dandanplay() {
        let comment = DandanComment {
            cid: 1024,
            time: 12.34,
            mode: 5,
            color: 16711680,
            user: "[BiliBili]abc".to_owned(),
            text: "前方高能".to_owned(),
        };
        let d = Danmaku::from_dandanplay(comment, "dytt_三体_1");
        assert_eq!(d.id, "dandanplay_1024");
        assert_eq!(d.r#type, TYPE_TOP);
        assert_eq!(d.color, "#FF0000");
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["videoId"], "dytt_三体_1");
        assert_eq!(value["type"], 1);
        assert_eq!(value["createTime"], 0);
    }

    #[tokio::test]
    async fn test_fetch_merged_with_only_local() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        for (time, text) in [(9.0, "晚"), (1.5, "早")] {
            store::insert(
                &db,
                NewDanmaku {
                    video_id: video_id("dytt", "三 体", 1),
                    user_id: "bob".to_owned(),
                    time,
                    text: text.to_owned(),
                    color: DEFAULT_COLOR.to_owned(),
                    r#type: TYPE_SCROLL,
                },
            )
            .await
            .unwrap();
        }
        let option = DanmakuOption {
            enabled: false,
            ..Default::default()
        };
        let client = Client::new().unwrap();
        let merged = fetch_merged(&db, &client, &option, "dytt", "三体", 1).await;
        assert_eq!(merged.iter().map(|d| d.text.as_str()).collect::<Vec<_>>(), vec!["早", "晚"]);
        assert!(merged.iter().all(|d| d.create_time > 0));
    }

    #[tokio::test]
    async fn test_fetch_merged_degrades_when_dandanplay_unreachable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let mut option = DanmakuOption::default();
        option.dandanplay.endpoints = vec!["http://127.0.0.1:9".to_owned()];
        option.dandanplay.timeout = 1;
        let client = Client::new().unwrap();
        assert!(fetch_merged(&db, &client, &option, "dytt", "三体", 1).await.is_empty());
    }
}
