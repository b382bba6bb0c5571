use chrono::{DateTime, Local};
use serde::Deserialize;

use super::{
    new_id,
    validate::{Rule, escape, require},
};
use crate::error::Result;

/// 文章下的评论
///
/// `author` 与 `body` 在入库前已转义。
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Local>,
    /// 读取时附加
    pub replies: Vec<Reply>,
}

/// 评论下的回复
#[derive(Debug, Clone)]
pub struct Reply {
    pub id: String,
    pub comment_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Local>,
}

/// 评论与回复共用的表单
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub name: String,
    pub body: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<()> {
        require(
            "name",
            &self.name,
            Rule::DisplayName,
            r#"Invalid input in name field or name not given, only "_" special character is allowed in name field, a minimum of two characters and maximum of 35 characters"#,
        )?;
        require("body", &self.body, Rule::Text, "Invalid input in comment field")
    }

    /// 返回转义后的 `(author, body)`
    pub fn escaped(&self) -> (String, String) {
        (escape(&self.name), escape(&self.body))
    }
}

impl Comment {
    pub fn new(post_id: impl Into<String>, author: String, body: String) -> Self {
        Self {
            id: new_id(),
            post_id: post_id.into(),
            author,
            body,
            created_at: Local::now(),
            replies: Vec::new(),
        }
    }
}

impl Reply {
    pub fn new(comment_id: impl Into<String>, author: String, body: String) -> Self {
        Self {
            id: new_id(),
            comment_id: comment_id.into(),
            author,
            body,
            created_at: Local::now(),
        }
    }
}

/// 具有作者与正文、参与重复检测的条目
pub trait Authored {
    fn author(&self) -> &str;
    fn body(&self) -> &str;
}

impl Authored for Comment {
    fn author(&self) -> &str {
        &self.author
    }

    fn body(&self) -> &str {
        &self.body
    }
}

impl Authored for Reply {
    fn author(&self) -> &str {
        &self.author
    }

    fn body(&self) -> &str {
        &self.body
    }
}

/// 去除首尾空白并转为小写
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// 线性扫描 `existing`，判断是否已有相同（规范化后）作者与正文的条目
pub fn is_duplicate<'a, T>(
    existing: impl IntoIterator<Item = &'a T>,
    author: &str,
    body: &str,
) -> bool
where
    T: Authored + 'a,
{
    let (author, body) = (normalize(author), normalize(body));
    existing
        .into_iter()
        .any(|item| normalize(item.author()) == author && normalize(item.body()) == body)
}
