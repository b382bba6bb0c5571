//! 表单字段校验
//!
//! 每个字段对应一条整串匹配的 [`Rule`]。调用方按顺序校验，第一条失败即返回，
//! 此时尚未产生任何持久化副作用。
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// 字段规则
///
/// 空白字符仅指 ASCII 空白（空格、`\t`、`\n`、`\r`、`\x0C`），其余控制字符一律拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// 标题、正文、引用等长文本：字母、数字、空白以及除反引号外的 ASCII 标点
    Text,
    /// 小标题：字母、数字、空白以及 `. , ? / \`
    Heading,
    /// 人名：字母与空白
    PersonName,
    /// 评论者昵称：字母、空白与 `_`，长度 2 到 35
    DisplayName,
    /// 视频路径：字母、数字、空白与 `_`
    VideoPath,
    /// 邮箱地址
    Email,
}

static TEXT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[\t\n\x0C\r a-zA-Z0-9!-/:-@\[-_\{-~]+$"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"^[\t\n\x0C\r a-zA-Z0-9.,?/\\]+$"));
static PERSON_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"^[\t\n\x0C\r a-zA-Z]+$"));
static DISPLAY_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[\t\n\x0C\r a-zA-Z_]{2,35}$"));
static VIDEO_PATH: LazyLock<Regex> = LazyLock::new(|| compile(r"^[\t\n\x0C\r a-zA-Z0-9_]+$"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^[a-zA-Z0-9.!#$%&'*+/=?^_\{|\}~-]{3,}@[a-zA-Z0-9]{2,}\.[a-zA-Z]{2,}(\.[a-zA-Z]+)?$")
});

fn compile(pattern: &str) -> Regex {
    // 模式均为编译期常量
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid field pattern {pattern}: {e}"))
}

impl Rule {
    fn regex(self) -> &'static Regex {
        match self {
            Rule::Text => &TEXT,
            Rule::Heading => &HEADING,
            Rule::PersonName => &PERSON_NAME,
            Rule::DisplayName => &DISPLAY_NAME,
            Rule::VideoPath => &VIDEO_PATH,
            Rule::Email => &EMAIL,
        }
    }
}

/// 判断 `value` 是否整体满足 `rule`
pub fn validate(value: &str, rule: Rule) -> bool {
    rule.regex().is_match(value)
}

/// 必填字段：不满足规则时返回带字段名的 [`Error::Validation`]
pub fn require(field: &'static str, value: &str, rule: Rule, message: &str) -> Result<()> {
    if validate(value, rule) {
        Ok(())
    } else {
        Err(Error::validation(field, message))
    }
}

/// 可选字段：空白视为未填写，否则同 [`require`]
pub fn optional(field: &'static str, value: &str, rule: Rule, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Ok(());
    }
    require(field, value, rule, message)
}

/// 转义将被嵌入页面的不可信文本
pub fn escape(value: &str) -> String {
    html_escape::encode_safe(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accepts_whitelisted_punctuation() {
        assert!(validate("Hello, World 2024!", Rule::Text));
        assert!(validate(r#"a.b,c?d/e\f~!@#$%[]{}^&*()-_+=|:;'"<>"#, Rule::Text));
        assert!(validate("line one\nline two\ttabbed", Rule::Text));
    }

    #[test]
    fn test_text_rejects_control_and_non_ascii() {
        assert!(!validate("bad\u{0007}title", Rule::Text));
        assert!(!validate("null\0byte", Rule::Text));
        assert!(!validate("back`tick", Rule::Text));
        assert!(!validate("café", Rule::Text));
        assert!(!validate("", Rule::Text));
    }

    #[test]
    fn test_heading() {
        assert!(validate("Key points, part 1/2?", Rule::Heading));
        assert!(!validate("Key points!", Rule::Heading));
    }

    #[test]
    fn test_display_name_bounds() {
        assert!(validate("Al", Rule::DisplayName));
        assert!(validate("jane_doe the reader", Rule::DisplayName));
        assert!(!validate("A", Rule::DisplayName));
        assert!(!validate(&"a".repeat(36), Rule::DisplayName));
        assert!(validate(&"a".repeat(35), Rule::DisplayName));
        assert!(!validate("R2D2", Rule::DisplayName));
    }

    #[test]
    fn test_video_path_and_person_name() {
        assert!(validate("dQw4w9WgXcQ", Rule::VideoPath));
        assert!(!validate("watch?v=1", Rule::VideoPath));
        assert!(validate("Ada Lovelace", Rule::PersonName));
        assert!(!validate("Ada L.", Rule::PersonName));
    }

    #[test]
    fn test_email() {
        assert!(validate("reader@example.com", Rule::Email));
        assert!(validate("first.last@mail.co.uk", Rule::Email));
        assert!(!validate("ab@example.com", Rule::Email));
        assert!(!validate("reader@example", Rule::Email));
        assert!(!validate("reader example.com", Rule::Email));
    }

    #[test]
    fn test_optional_allows_blank() {
        assert!(optional("video", "  ", Rule::VideoPath, "bad").is_ok());
        let err = optional("video", "a-b", Rule::VideoPath, "bad video").unwrap_err();
        assert!(matches!(err, Error::Validation { field: "video", .. }));
        assert_eq!(err.to_string(), "bad video");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>hi"), "&lt;b&gt;hi");
        assert!(!escape("<script>alert(1)</script>").contains('<'));
    }
}
