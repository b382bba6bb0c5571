use chrono::{DateTime, Local};
use serde::Deserialize;

use super::{
    Comment,
    validate::{Rule, optional, require},
};
use crate::error::Result;

/// 已发布的文章
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub published: DateTime<Local>,
    /// 预计阅读时长（分钟），见 [`read_time`]
    pub read_time: i32,
    pub content: String,
    pub image_name: String,
    pub bullet_heading: Option<String>,
    pub bullet_points: Vec<String>,
    pub quote_heading: Option<String>,
    pub quote: Option<String>,
    pub quote_author: Option<String>,
    pub video_path: Option<String>,
    /// 读取时附加，不随文章一起存储
    pub comments: Vec<Comment>,
}

/// 发布表单中的文本字段
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub bullet_heading: String,
    pub bullet_points: String,
    pub quote_heading: String,
    pub quote: String,
    pub quote_author: String,
    pub video_path: String,
    pub admin_password: String,
}

/// 随表单上传的配图
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PostForm {
    /// 按表单顺序逐项校验，遇到第一个非法字段即返回
    pub fn validate(&self) -> Result<()> {
        require("title", &self.title, Rule::Text, "Invalid character in blog title")?;
        require("content", &self.content, Rule::Text, "Invalid character in content")?;
        optional(
            "bullet_heading",
            &self.bullet_heading,
            Rule::Heading,
            "Invalid character in bullet point heading",
        )?;
        optional(
            "bullet_points",
            &self.bullet_points,
            Rule::Text,
            "Invalid character in bullet points content",
        )?;
        optional(
            "quote_heading",
            &self.quote_heading,
            Rule::Heading,
            "Invalid character in blog quote heading",
        )?;
        optional("quote", &self.quote, Rule::Text, "Invalid character in blog quote content")?;
        optional(
            "quote_author",
            &self.quote_author,
            Rule::PersonName,
            "Invalid character in blog quote author",
        )?;
        optional(
            "video_path",
            &self.video_path,
            Rule::VideoPath,
            "Invalid character in youtube video path",
        )?;
        require(
            "admin_password",
            &self.admin_password,
            Rule::Text,
            "Invalid character in admin password",
        )
    }

    /// 以给定标识与配图生成文章，发布时间取当前时间
    pub fn into_post(self, id: String, image_name: String) -> Post {
        let read_time = read_time(&[
            &self.title,
            &self.content,
            &self.bullet_heading,
            &self.bullet_points,
            &self.quote,
            &self.quote_author,
        ]);

        Post {
            id,
            read_time,
            published: Local::now(),
            bullet_points: split_bullet_points(&self.bullet_points),
            bullet_heading: non_blank(self.bullet_heading),
            quote_heading: non_blank(self.quote_heading),
            quote: non_blank(self.quote),
            quote_author: non_blank(self.quote_author),
            video_path: non_blank(self.video_path),
            title: self.title,
            content: self.content,
            image_name,
            comments: Vec::new(),
        }
    }
}

/// 预计阅读时长：各字段字符总数除以 100 后四舍五入
pub fn read_time(parts: &[&str]) -> i32 {
    let chars: usize = parts.iter().map(|p| p.chars().count()).sum();
    (chars as f64 / 100.0).round() as i32
}

/// 将以 `/` 分隔的要点拆分为列表，忽略空项
pub fn split_bullet_points(raw: &str) -> Vec<String> {
    raw.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    fn form() -> PostForm {
        PostForm {
            title: "Learning Rust".into(),
            content: "Ownership, borrowing and lifetimes.".into(),
            admin_password: "hunter2".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_read_time_hundred_chars_is_one_minute() {
        let body = "B".repeat(99);
        assert_eq!(read_time(&["T", &body]), 1);
        assert_eq!(read_time(&["T", &"B".repeat(48)]), 0);
        assert_eq!(read_time(&["T", &"B".repeat(149)]), 2);
    }

    #[test]
    fn test_split_bullet_points() {
        assert_eq!(
            split_bullet_points("first / second/third/"),
            vec!["first", "second", "third"]
        );
        assert!(split_bullet_points("").is_empty());
    }

    #[test]
    fn test_validate_minimal_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_bad_field() {
        let mut f = form();
        f.title = "bad\u{1b}title".into();
        f.video_path = "not/valid".into();

        match f.validate() {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "title");
                assert_eq!(message, "Invalid character in blog title");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_validate_optional_field_when_present() {
        let mut f = form();
        f.quote_author = "Grace Hopper 2".into();
        assert!(matches!(
            f.validate(),
            Err(Error::Validation {
                field: "quote_author",
                ..
            })
        ));
    }

    #[test]
    fn test_into_post() {
        let mut f = form();
        f.bullet_heading = "Takeaways".into();
        f.bullet_points = "one/two".into();
        f.video_path = "  ".into();

        let post = f.into_post("abc".into(), "abc.png".into());
        assert_eq!(post.id, "abc");
        assert_eq!(post.image_name, "abc.png");
        assert_eq!(post.bullet_heading.as_deref(), Some("Takeaways"));
        assert_eq!(post.bullet_points, vec!["one", "two"]);
        assert!(post.video_path.is_none());
        assert!(post.quote.is_none());
        assert!(post.comments.is_empty());
    }
}
