//! Slack Web API client.
//!
//! The rest of the crate only depends on [`ChannelApi`]: list public channels
//! page by page and rename one channel. [`SlackClient`] is the blocking HTTP
//! implementation used by the CLI.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::settings::Settings;

const LIST_METHOD: &str = "conversations.list";
const RENAME_METHOD: &str = "conversations.rename";

/// A channel as returned by one listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
}

/// One page of the channel listing. An empty `next_cursor` ends pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPage {
    pub channels: Vec<ChannelSummary>,
    pub next_cursor: String,
}

/// Failure of a single remote call.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The caller must wait before retrying. `None` means no usable hint.
    RateLimited(Option<Duration>),
    Failed(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Failed(err)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Remote operations the planner consumes.
pub trait ChannelApi {
    /// Fetch one page of public channels, archived ones included.
    fn list_channels(&self, cursor: &str, limit: u32) -> ApiResult<ChannelPage>;

    fn rename_channel(&self, channel_id: &str, new_name: &str) -> ApiResult<()>;
}

/// Blocking Slack client authenticated with a user token.
pub struct SlackClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(token: &str, settings: &Settings) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::auth_missing_token(crate::settings::TOKEN_ENV_VAR));
        }

        let client = Client::builder()
            .user_agent(format!("channel-rename/{}", env!("CARGO_PKG_VERSION")))
            .timeout(settings.api_timeout())
            .build()
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some("create HTTP client".to_string()))
            })?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    fn send(&self, method: &str, request: RequestBuilder) -> ApiResult<Value> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| Error::remote_request_failed(method, e.to_string(), e.is_timeout()))?;
        parse_response(method, response)
    }
}

impl ChannelApi for SlackClient {
    fn list_channels(&self, cursor: &str, limit: u32) -> ApiResult<ChannelPage> {
        let mut query = vec![
            ("types", "public_channel".to_string()),
            ("exclude_archived", "false".to_string()),
            ("limit", limit.to_string()),
        ];
        if !cursor.is_empty() {
            query.push(("cursor", cursor.to_string()));
        }

        let request = self.client.get(self.url(LIST_METHOD)).query(&query);
        let body = self.send(LIST_METHOD, request)?;
        Ok(parse_channel_page(&body)?)
    }

    fn rename_channel(&self, channel_id: &str, new_name: &str) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url(RENAME_METHOD))
            .json(&json!({ "channel": channel_id, "name": new_name }));
        self.send(RENAME_METHOD, request)?;
        Ok(())
    }
}

fn parse_response(method: &str, response: Response) -> ApiResult<Value> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let hint = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        return Err(ApiError::RateLimited(hint));
    }

    let body = response
        .text()
        .map_err(|e| Error::remote_request_failed(method, e.to_string(), e.is_timeout()))?;

    if !status.is_success() {
        let code = status.as_u16();
        return Err(Error::remote_api_error(method, Some(code), format!("HTTP {}", code)).into());
    }

    let value: Value = serde_json::from_str(&body).map_err(|e| {
        Error::internal_json(e.to_string(), Some(format!("parse {} response", method)))
    })?;

    check_ok(method, value)
}

/// Slack reports most failures as HTTP 200 with `"ok": false`.
fn check_ok(method: &str, value: Value) -> ApiResult<Value> {
    if value.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(value);
    }

    let code = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown_error");

    if code == "ratelimited" || code == "rate_limited" {
        return Err(ApiError::RateLimited(None));
    }

    Err(Error::remote_api_error(method, None, code).into())
}

/// Retry-After is a whole number of seconds for Slack.
fn parse_retry_after(raw: &str) -> Option<Duration> {
    raw.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[derive(Deserialize)]
struct ListBody {
    #[serde(default)]
    channels: Vec<ChannelSummary>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

fn parse_channel_page(body: &Value) -> Result<ChannelPage> {
    let parsed: ListBody = serde_json::from_value(body.clone()).map_err(|e| {
        Error::internal_json(e.to_string(), Some(format!("parse {} response", LIST_METHOD)))
    })?;

    Ok(ChannelPage {
        channels: parsed.channels,
        next_cursor: parsed
            .response_metadata
            .map(|m| m.next_cursor)
            .unwrap_or_default(),
    })
}
