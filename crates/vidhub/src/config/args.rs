use std::path::PathBuf;
use std::sync::LazyLock;

use clap::Parser;

pub static ARGS: LazyLock<Args> = LazyLock::new(Args::parse);

#[derive(Parser)]
#[command(name = "vidhub", version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, default_value = "None,vidhub=info", env = "RUST_LOG")]
    pub log_level: String,

    #[arg(short, long, env = "VIDHUB_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// 本地存储使用的数据库，默认是配置目录下的 sqlite 文件
    #[arg(short, long, env = "VIDHUB_DATABASE_URL")]
    pub database_url: Option<String>,
}
