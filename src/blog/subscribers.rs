use tracing::instrument;

use super::Blog;
use crate::{
    content::{
        Subscriber,
        validate::{Rule, require},
    },
    error::{Error, Result, Submission},
    notify::welcome_mail,
    storage::{Changeset, Querier, Store},
};

impl Blog {
    /// 登记订阅者
    ///
    /// 依次检查格式、是否已订阅、地址是否可投递，发送欢迎邮件成功后才写入。
    #[instrument(skip(self))]
    pub async fn subscribe(&self, email: &str) -> Result<Subscriber> {
        let email = email.trim();
        require("email", email, Rule::Email, "Invalid email address")?;

        if self.db.subscriber_exists(email).await? {
            return Err(Error::Duplicate(Submission::Subscriber));
        }

        if !self.checker.is_deliverable(email).await? {
            return Err(Error::validation("email", "Unregistered email address"));
        }

        self.mailer
            .send(welcome_mail(&self.site.name, &self.site.url, email))
            .await?;

        let subscriber = Subscriber::new(email);
        let mut changes = Changeset::default();
        changes.insert_subscriber(subscriber.clone());
        self.db.commit(changes).await?;
        tracing::info!("new subscriber");

        Ok(subscriber)
    }
}
