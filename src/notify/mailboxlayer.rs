use async_trait::async_trait;
use serde::Deserialize;

use super::Deliverability;
use crate::error::{Error, Result};

const MAILBOXLAYER_CHECK_API: &str = "https://apilayer.net/api/check";

/// 评分低于该值视为不可投递
const MIN_SCORE: f64 = 0.5;

/// MailboxLayer 用于检查邮箱地址是否真实可投递。
///
/// 通过 apilayer 的 `check` 接口进行 SMTP 探测。
#[derive(Clone)]
pub struct MailboxLayer {
    client: reqwest::Client,
    access_key: String,
    endpoint: String,
}

impl MailboxLayer {
    /// 使用指定的 access key 创建检查器
    ///
    /// ```ignore
    /// let checker = MailboxLayer::new("your_access_key");
    /// ```
    pub fn new<T: AsRef<str>>(access_key: T) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::external("email verification", e))?;

        Ok(Self {
            client,
            access_key: access_key.as_ref().to_string(),
            endpoint: MAILBOXLAYER_CHECK_API.to_string(),
        })
    }

    /// 替换接口地址，用于测试或代理
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckResponse {
    smtp_check: bool,
    score: f64,
    /// 仅在请求出错时出现
    success: Option<bool>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    info: String,
}

impl CheckResponse {
    fn verdict(self) -> Result<bool> {
        if self.success == Some(false) {
            let info = self.error.map(|e| e.info).unwrap_or_default();
            return Err(Error::external("email verification", info));
        }
        Ok(self.smtp_check && self.score >= MIN_SCORE)
    }
}

#[async_trait]
impl Deliverability for MailboxLayer {
    #[tracing::instrument(name = "mailboxlayer check", skip(self))]
    async fn is_deliverable(&self, email: &str) -> Result<bool> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("email", email),
                ("smtp", "1"),
                ("format", "1"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_error)?;

        let body: CheckResponse = resp.json().await.map_err(request_error)?;

        tracing::debug!(smtp_check = body.smtp_check, score = body.score);
        body.verdict()
    }
}

/// 请求地址带有 access key，错误信息中去掉 URL
fn request_error(e: reqwest::Error) -> Error {
    Error::external("email verification", e.without_url())
}
