//! 本地存储的弹幕

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "danmaku")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 由 source、去空白的标题与集数拼接得到
    pub video_id: String,
    pub user_id: String,
    /// 弹幕出现的时间点，单位为秒
    pub time: f64,
    pub text: String,
    pub color: String,
    /// 0 滚动，1 顶部，2 底部
    pub r#type: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
