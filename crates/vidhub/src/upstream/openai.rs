//! OpenAI 兼容的 chat completions 接口

use anyhow::Result;
use reqwest::{Method, header};
use serde::{Deserialize, Serialize};

use crate::config::AiOption;
use crate::upstream::Client;
use crate::upstream::error::{ErrorForStatusExt, UpstreamError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChatMessage,
}

pub struct OpenAi<'a> {
    client: &'a Client,
    option: &'a AiOption,
}

impl<'a> OpenAi<'a> {
    pub fn new(client: &'a Client, option: &'a AiOption) -> Self {
        Self { client, option }
    }

    /// 在对话前插入配置中的系统提示词，返回模型回复的正文
    pub async fn chat(&self, history: Vec<ChatMessage>) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.option.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_owned(),
                content: self.option.system_prompt.clone(),
            });
        }
        messages.extend(history);
        let res = self
            .client
            .request(
                Method::POST,
                &format!("{}/chat/completions", self.option.api.trim_end_matches('/')),
            )
            .timeout(self.option.timeout())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.option.api_key))
            .json(&ChatRequest {
                model: &self.option.model,
                messages,
                temperature: self.option.temperature,
                max_tokens: self.option.max_tokens,
            })
            .send()
            .await?
            .error_for_status_ext()?
            .json::<ChatResponse>()
            .await?;
        res.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::InvalidPayload("chat completion without choices".to_owned()).into())
    }
}
