//! 页面模板与视图模型
//!
//! 评论、回复的作者与正文入库前已转义，模板中以 `|safe` 输出；其余字段由模板自动转义。
use askama::Template;
use chrono::{DateTime, Local};

use crate::content::{Comment, Post, Reply};

/// 上传图片的访问前缀
pub const IMAGE_PREFIX: &str = "/uploads/";

/// 列表页摘要长度，按字符计
pub const SUMMARY_CHARS: usize = 219;

/// ANSIC 风格的时间格式，如 `Mon Jan  2 15:04:05 2006`
const ANSIC: &str = "%a %b %e %H:%M:%S %Y";

fn ansic(time: &DateTime<Local>) -> String {
    time.format(ANSIC).to_string()
}

/// 截取前 [`SUMMARY_CHARS`] 个字符
pub fn summary(content: &str) -> String {
    content.chars().take(SUMMARY_CHARS).collect()
}

/// 列表页中的文章卡片
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    pub published: String,
    pub read_time: i32,
    pub comment_count: usize,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            summary: summary(&post.content),
            image_url: format!("{IMAGE_PREFIX}{}", post.image_name),
            published: ansic(&post.published),
            read_time: post.read_time,
            comment_count: post.comments.len(),
        }
    }
}

/// 文章详情，可选字段为空串表示未填写
pub struct PostView {
    pub id: String,
    pub title: String,
    pub published: String,
    pub read_time: i32,
    pub content: String,
    pub image_url: String,
    pub bullet_heading: String,
    pub bullet_points: Vec<String>,
    pub quote_heading: String,
    pub quote: String,
    pub quote_author: String,
    pub video_url: String,
    pub comments: Vec<CommentView>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            published: ansic(&post.published),
            read_time: post.read_time,
            content: post.content.clone(),
            image_url: format!("{IMAGE_PREFIX}{}", post.image_name),
            bullet_heading: text(&post.bullet_heading),
            bullet_points: post.bullet_points.clone(),
            quote_heading: text(&post.quote_heading),
            quote: text(&post.quote),
            quote_author: text(&post.quote_author),
            video_url: post
                .video_path
                .as_deref()
                .map(|v| format!("https://www.youtube.com/embed/{}", v.trim()))
                .unwrap_or_default(),
            comments: post.comments.iter().map(CommentView::from).collect(),
        }
    }
}

pub struct CommentView {
    pub id: String,
    pub author: String,
    pub body: String,
    pub published: String,
    pub replies: Vec<ReplyView>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            author: comment.author.clone(),
            body: comment.body.clone(),
            published: ansic(&comment.created_at),
            replies: comment.replies.iter().map(ReplyView::from).collect(),
        }
    }
}

pub struct ReplyView {
    pub author: String,
    pub body: String,
    pub published: String,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            author: reply.author.clone(),
            body: reply.body.clone(),
            published: ansic(&reply.created_at),
        }
    }
}

/// 首页与翻页
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub site_name: String,
    pub page: u32,
    pub has_previous: bool,
    pub posts: Vec<PostCard>,
}

impl IndexPage {
    pub fn new(site_name: &str, page: u32, posts: &[Post]) -> Self {
        Self {
            site_name: site_name.to_string(),
            page,
            has_previous: page > 0,
            posts: posts.iter().map(PostCard::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "blog-post.html")]
pub struct PostPage {
    pub site_name: String,
    pub post: PostView,
}

impl PostPage {
    pub fn new(site_name: &str, post: &Post) -> Self {
        Self {
            site_name: site_name.to_string(),
            post: PostView::from(post),
        }
    }
}

#[derive(Template)]
#[template(path = "reply.html")]
pub struct ReplyPage {
    pub site_name: String,
    pub post_id: String,
    pub comment: CommentView,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutPage {
    pub site_name: String,
}

/// 发布页，`message` 非空时表示刚发布成功
#[derive(Template)]
#[template(path = "new-post.html")]
pub struct NewPostPage {
    pub site_name: String,
    pub message: String,
    pub notice: String,
    pub post_id: String,
}
