use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use leaky_bucket::RateLimiter;
use reqwest::{Method, header};
use ua_generator::ua;

use crate::config::VersionedCache;

// 一个对 reqwest::Client 的简单封装，所有外部请求共用
#[derive(Clone)]
pub struct Client(reqwest::Client);

impl Client {
    pub fn new() -> Result<Self> {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            rustls::crypto::ring::default_provider()
                .install_default()
                .expect("Failed to install rustls crypto provider");
        });
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(ua::spoof_chrome_ua()),
        );
        Ok(Self(
            reqwest::Client::builder()
                .default_headers(headers)
                .gzip(true)
                .connect_timeout(Duration::from_secs(10))
                .build()?,
        ))
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.0.request(method, url)
    }
}

/// 服务使用的外部请求入口，额外持有豆瓣请求的限流器
pub struct HubClient {
    pub client: Client,
    douban_limiter: VersionedCache<RateLimiter>,
}

impl HubClient {
    pub fn new() -> Result<Self> {
        let client = Client::new()?;
        // 容量为 1 的桶：两次豆瓣请求之间至少间隔 request_interval
        let douban_limiter = VersionedCache::new(|config| {
            Ok(RateLimiter::builder()
                .initial(1)
                .refill(1)
                .max(1)
                .interval(Duration::from_millis(config.douban.request_interval.max(1)))
                .build())
        })?;
        Ok(Self { client, douban_limiter })
    }

    /// 获取一个发往豆瓣的请求，会先等待距上一次请求满足最小间隔
    pub async fn douban_request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let limiter: Arc<RateLimiter> = self.douban_limiter.load_full();
        limiter.acquire_one().await;
        self.client
            .request(method, url)
            .header(header::REFERER, "https://movie.douban.com/")
    }
}
