mod args;
mod current;
mod default;
mod item;
mod versioned_cache;
mod versioned_config;

pub use crate::config::args::ARGS;
pub use crate::config::current::{CONFIG_DIR, Config};
pub use crate::config::item::{
    AiOption, ApiSite, ContentFilter, DandanplayOption, DanmakuOption, DoubanOption, NetdiskOption, YoutubeOption,
};
pub use crate::config::versioned_cache::VersionedCache;
pub use crate::config::versioned_config::VersionedConfig;
