use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use vidhub_migration::{Migrator, MigratorTrait};

use crate::config::{ARGS, CONFIG_DIR};

fn database_url() -> String {
    ARGS.database_url.clone().unwrap_or_else(|| {
        format!("sqlite://{}?mode=rwc", CONFIG_DIR.join("data.sqlite").to_string_lossy())
    })
}

pub async fn database_connection() -> Result<DatabaseConnection> {
    let mut option = ConnectOptions::new(database_url());
    option
        .max_connections(50)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(90))
        .sqlx_logging(false);
    Ok(Database::connect(option).await?)
}

pub async fn migrate_database() -> Result<()> {
    // 迁移使用单独的默认连接，多连接的连接池可能导致迁移顺序异常
    let connection = Database::connect(database_url()).await?;
    Ok(Migrator::up(&connection, None).await?)
}
