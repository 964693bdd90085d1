pub use api_site::{ApiSiteClient, SearchResult};
pub use client::{Client, HubClient};
pub use dandanplay::{DandanComment, Dandanplay};
pub use douban::{Douban, DoubanDetails, DoubanItem};
pub use error::UpstreamError;
pub use netdisk::{Netdisk, NetdiskResult};
pub use openai::{ChatMessage, OpenAi};
pub use youtube::{Youtube, YoutubeVideo};

mod api_site;
mod client;
mod dandanplay;
mod douban;
mod error;
mod netdisk;
mod openai;
mod youtube;
