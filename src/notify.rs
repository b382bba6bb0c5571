mod mailboxlayer;
mod message;
mod smtp;

use async_trait::async_trait;

use crate::error::Result;

pub use self::{
    mailboxlayer::MailboxLayer,
    message::{new_post_mail, welcome_mail},
    smtp::{SmtpMailer, SmtpSettings},
};

/// 一封待发送的 HTML 邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// 邮件发送
///
/// 同步发送，失败返回 [`Error::ExternalService`](crate::error::Error::ExternalService)，不重试。
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<()>;
}

/// 邮箱可达性检查
#[async_trait]
pub trait Deliverability: Send + Sync {
    /// 返回该地址是否可投递
    async fn is_deliverable(&self, email: &str) -> Result<bool>;
}
