use chrono::{DateTime, Local};

use super::new_id;

/// 邮件订阅者
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Local>,
}

impl Subscriber {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            email: email.into(),
            created_at: Local::now(),
        }
    }
}
