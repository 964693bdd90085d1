//! PanSou 兼容的网盘资源搜索

use std::collections::BTreeMap;

use anyhow::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::NetdiskOption;
use crate::upstream::Client;
use crate::upstream::error::{ErrorForStatusExt, UpstreamError};

#[derive(Deserialize, Debug)]
struct NetdiskResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<NetdiskData>,
}

#[derive(Deserialize, Debug, Default)]
struct NetdiskData {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    merged_by_type: BTreeMap<String, Vec<NetdiskLink>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetdiskLink {
    pub url: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub source: String,
}

/// 按网盘类型分组的搜索结果
#[derive(Serialize, Debug, Default)]
pub struct NetdiskResult {
    pub total: u64,
    pub merged_by_type: BTreeMap<String, Vec<NetdiskLink>>,
}

impl TryFrom<NetdiskResponse> for NetdiskResult {
    type Error = UpstreamError;

    fn try_from(res: NetdiskResponse) -> Result<Self, Self::Error> {
        if res.code != 0 {
            return Err(UpstreamError::ErrorResponse(res.code, res.message));
        }
        let data = res.data.unwrap_or_default();
        Ok(Self {
            total: data.total,
            merged_by_type: data.merged_by_type,
        })
    }
}

pub struct Netdisk<'a> {
    client: &'a Client,
    option: &'a NetdiskOption,
}

impl<'a> Netdisk<'a> {
    pub fn new(client: &'a Client, option: &'a NetdiskOption) -> Self {
        Self { client, option }
    }

    pub async fn search(&self, keyword: &str) -> Result<NetdiskResult> {
        let mut body = json!({ "kw": keyword, "res": "merge" });
        if !self.option.cloud_types.is_empty() {
            body["cloud_types"] = json!(self.option.cloud_types);
        }
        let res = self
            .client
            .request(
                Method::POST,
                &format!("{}/api/search", self.option.api.trim_end_matches('/')),
            )
            .timeout(self.option.timeout())
            .json(&body)
            .send()
            .await?
            .error_for_status_ext()?
            .json::<NetdiskResponse>()
            .await?;
        Ok(NetdiskResult::try_from(res)?)
    }
}
