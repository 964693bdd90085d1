use anyhow::Result;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use vidhub_entity::danmaku;

/// 待写入本地存储的弹幕
pub struct NewDanmaku {
    pub video_id: String,
    pub user_id: String,
    pub time: f64,
    pub text: String,
    pub color: String,
    pub r#type: i32,
}

/// 某个视频的全部本地弹幕，按时间升序
pub async fn list(db: &DatabaseConnection, video_id: &str) -> Result<Vec<danmaku::Model>> {
    Ok(danmaku::Entity::find()
        .filter(danmaku::Column::VideoId.eq(video_id))
        .order_by_asc(danmaku::Column::Time)
        .order_by_asc(danmaku::Column::Id)
        .all(db)
        .await?)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<danmaku::Model>> {
    Ok(danmaku::Entity::find_by_id(id).one(db).await?)
}

pub async fn insert(db: &DatabaseConnection, new_danmaku: NewDanmaku) -> Result<danmaku::Model> {
    let model = danmaku::ActiveModel {
        video_id: Set(new_danmaku.video_id),
        user_id: Set(new_danmaku.user_id),
        time: Set(new_danmaku.time),
        text: Set(new_danmaku.text),
        color: Set(new_danmaku.color),
        r#type: Set(new_danmaku.r#type),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    Ok(danmaku::Entity::insert(model).exec_with_returning(db).await?)
}

/// 返回是否真的删除了记录
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool> {
    let res = danmaku::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use vidhub_migration::{Migrator, MigratorTrait};

    use super::*;

    async fn memory_database() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn new_danmaku(video_id: &str, time: f64, text: &str) -> NewDanmaku {
        NewDanmaku {
            video_id: video_id.to_owned(),
            user_id: "alice".to_owned(),
            time,
            text: text.to_owned(),
            color: "#FFFFFF".to_owned(),
            r#type: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_list_and_delete() {
        let db = memory_database().await;
        let late = insert(&db, new_danmaku("dytt_三体_1", 42.5, "后发")).await.unwrap();
        insert(&db, new_danmaku("dytt_三体_1", 3.0, "先发")).await.unwrap();
        insert(&db, new_danmaku("dytt_三体_2", 1.0, "别的分集")).await.unwrap();

        let listed = list(&db, "dytt_三体_1").await.unwrap();
        assert_eq!(
            listed.iter().map(|d| d.text.as_str()).collect::<Vec<_>>(),
            vec!["先发", "后发"]
        );
        assert_eq!(find(&db, late.id).await.unwrap().unwrap().time, 42.5);

        assert!(delete(&db, late.id).await.unwrap());
        assert!(!delete(&db, late.id).await.unwrap());
        assert!(find(&db, late.id).await.unwrap().is_none());
        assert_eq!(list(&db, "dytt_三体_1").await.unwrap().len(), 1);
    }
}
