use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use super::{Mail, Mailer};
use crate::error::{Error, Result};

/// SMTP 中继配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// 发件地址
    pub from: String,
    pub from_name: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: String::new(),
            from_name: None,
        }
    }
}

/// 通过 STARTTLS 中继发送邮件
///
/// 收件人一律放在 Bcc，`To` 为发件人自身，避免订阅者互相看到地址。
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let from = Mailbox::new(
            settings.from_name.clone(),
            settings
                .from
                .parse()
                .map_err(|e| Error::external("smtp", format!("invalid sender address: {e}")))?,
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| Error::external("smtp", e))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, mail: Mail) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.from.clone())
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML);

        for recipient in &mail.recipients {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| Error::external("smtp", format!("invalid recipient {recipient}: {e}")))?;
            builder = builder.bcc(mailbox);
        }

        builder.body(mail.html).map_err(|e| Error::external("smtp", e))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "smtp send", skip_all, fields(subject = %mail.subject, recipients = mail.recipients.len()))]
    async fn send(&self, mail: Mail) -> Result<()> {
        if mail.recipients.is_empty() {
            return Ok(());
        }

        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| Error::external("smtp", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".into(),
            port: 587,
            username: "user".into(),
            password: "secret".into(),
            from: "blog@example.com".into(),
            from_name: Some("Inkpost".into()),
        }
    }

    #[tokio::test]
    async fn test_build_message_uses_bcc() {
        let mailer = SmtpMailer::new(&settings()).unwrap();
        let message = mailer
            .build_message(Mail {
                recipients: vec!["a@example.com".into(), "b@example.com".into()],
                subject: "Hello".into(),
                html: "<p>hi</p>".into(),
            })
            .unwrap();

        let to: Vec<String> = message.envelope().to().iter().map(|a| a.to_string()).collect();
        assert!(to.contains(&"a@example.com".to_string()));
        assert!(to.contains(&"b@example.com".to_string()));

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(!raw.contains("Bcc:"));
    }

    #[tokio::test]
    async fn test_invalid_recipient() {
        let mailer = SmtpMailer::new(&settings()).unwrap();
        let err = mailer
            .build_message(Mail {
                recipients: vec!["not an address".into()],
                subject: "Hello".into(),
                html: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::ExternalService { service: "smtp", .. }));
    }
}
