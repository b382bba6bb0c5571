use chrono::{DateTime, Local};

use crate::content::{Comment, Post, Reply};

/// `posts` 表中的一行
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: String,
    pub title: String,
    pub published: DateTime<Local>,
    pub read_time: i32,
    pub content: String,
    pub image_name: String,
    pub bullet_heading: Option<String>,
    pub bullet_points: Vec<String>,
    pub quote_heading: Option<String>,
    pub quote: Option<String>,
    pub quote_author: Option<String>,
    pub video_path: Option<String>,
}

/// `comments` 表中的一行
#[derive(Debug, sqlx::FromRow)]
pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Local>,
}

/// `replies` 表中的一行
#[derive(Debug, sqlx::FromRow)]
pub struct ReplyRow {
    pub id: String,
    pub comment_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Local>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            published: row.published,
            read_time: row.read_time,
            content: row.content,
            image_name: row.image_name,
            bullet_heading: row.bullet_heading,
            bullet_points: row.bullet_points,
            quote_heading: row.quote_heading,
            quote: row.quote,
            quote_author: row.quote_author,
            video_path: row.video_path,
            comments: Vec::new(),
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            author: row.author,
            body: row.body,
            created_at: row.created_at,
            replies: Vec::new(),
        }
    }
}

impl From<ReplyRow> for Reply {
    fn from(row: ReplyRow) -> Self {
        Reply {
            id: row.id,
            comment_id: row.comment_id,
            author: row.author,
            body: row.body,
            created_at: row.created_at,
        }
    }
}
