use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Danmaku::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Danmaku::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Danmaku::VideoId).string().not_null())
                    .col(ColumnDef::new(Danmaku::UserId).string().not_null())
                    .col(ColumnDef::new(Danmaku::Time).double().not_null())
                    .col(ColumnDef::new(Danmaku::Text).string().not_null())
                    .col(ColumnDef::new(Danmaku::Color).string().not_null())
                    .col(ColumnDef::new(Danmaku::Type).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Danmaku::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        // 弹幕总是按视频读取并按时间排序
        manager
            .create_index(
                Index::create()
                    .table(Danmaku::Table)
                    .name("idx_danmaku_video_id_time")
                    .col(Danmaku::VideoId)
                    .col(Danmaku::Time)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Danmaku::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Danmaku {
    Table,
    Id,
    VideoId,
    UserId,
    Time,
    Text,
    Color,
    Type,
    CreatedAt,
}
