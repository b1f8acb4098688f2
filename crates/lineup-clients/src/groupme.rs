// GroupMe bot webhook: posts one text message per call.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use lineup_core::error::FetchFailure;
use lineup_core::source::MessageSink;

use crate::USER_AGENT;

pub const GROUPME_API_URL: &str = "https://api.groupme.com/v3";

#[derive(Debug, Serialize)]
struct BotMessage<'a> {
    bot_id: &'a str,
    text: &'a str,
}

pub struct GroupMeClient {
    http: reqwest::Client,
    bot_id: String,
    post_url: String,
}

impl GroupMeClient {
    pub fn new(bot_id: impl Into<String>) -> Self {
        Self::with_base_url(bot_id, GROUPME_API_URL)
    }

    pub fn with_base_url(bot_id: impl Into<String>, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_http(http, bot_id, base_url)
    }

    pub fn with_http(http: reqwest::Client, bot_id: impl Into<String>, base_url: &str) -> Self {
        Self {
            http,
            bot_id: bot_id.into(),
            post_url: format!("{}/bots/post", base_url.trim_end_matches('/')),
        }
    }

    pub fn post_url(&self) -> &str {
        &self.post_url
    }
}

#[async_trait]
impl MessageSink for GroupMeClient {
    async fn post(&self, text: &str) -> Result<bool, FetchFailure> {
        let body = BotMessage {
            bot_id: &self.bot_id,
            text,
        };

        let response = self
            .http
            .post(&self.post_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%status, "bot message posted");
        Ok(is_accepted(status))
    }
}

/// The bot endpoint answers 202 Accepted for a delivered message.
pub(crate) fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::ACCEPTED
}
