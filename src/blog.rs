//! 博客的核心操作
//!
//! [`Blog`] 持有存储、邮件、可达性检查等协作者，全部在构造时注入。
//! 每个操作都是一次完整的「校验 → 查询 → 写入 → 通知」流程，不持有跨请求状态。
mod comments;
mod pages;
mod posts;
mod subscribers;

use std::sync::Arc;

use crate::{
    auth::AdminGate,
    media::ImageStore,
    notify::{Deliverability, Mailer},
    storage::Database,
};

pub use self::{
    pages::{PAGE_SIZE, page_location},
    posts::{Notification, PublishOutcome, assemble},
};

/// 站点信息，用于页面与邮件
#[derive(Debug, Clone)]
pub struct Site {
    pub name: String,
    /// 不带结尾 `/` 的站点根地址
    pub url: String,
}

#[derive(Clone)]
pub struct Blog {
    db: Arc<dyn Database>,
    mailer: Arc<dyn Mailer>,
    checker: Arc<dyn Deliverability>,
    images: ImageStore,
    admin: AdminGate,
    site: Site,
}

impl Blog {
    pub fn new(
        db: Arc<dyn Database>,
        mailer: Arc<dyn Mailer>,
        checker: Arc<dyn Deliverability>,
        images: ImageStore,
        admin: AdminGate,
        site: Site,
    ) -> Self {
        Self {
            db,
            mailer,
            checker,
            images,
            admin,
            site,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }
}
