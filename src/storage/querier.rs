use async_trait::async_trait;

use super::{
    DBPool,
    models::{CommentRow, PostRow, ReplyRow},
};
use crate::{
    content::{Comment, Post, Reply},
    error::Result,
};

const POST_COLUMNS: &str = r#"
    id, title, published, read_time, content, image_name,
    bullet_heading, bullet_points, quote_heading, quote, quote_author, video_path
"#;

/// 用于查询文章、评论、回复与订阅者
///
/// 返回的 [`Post`] 与 [`Comment`] 不含子节点，树形结构由调用方组装。
#[async_trait]
pub trait Querier: Send + Sync {
    /// 按发布时间倒序（相同时按 `id`）跳过 `skip` 篇后取至多 `limit` 篇
    async fn posts_page(&self, skip: i64, limit: i64) -> Result<Vec<Post>>;

    /// 文章总数
    async fn post_count(&self) -> Result<i64>;

    /// 查询单篇文章，不存在时返回 `None`
    async fn post(&self, id: &str) -> Result<Option<Post>>;

    /// 查询属于给定文章的全部评论，按创建顺序
    async fn comments_of(&self, post_ids: &[String]) -> Result<Vec<Comment>>;

    /// 查询单条评论
    async fn comment(&self, id: &str) -> Result<Option<Comment>>;

    /// 查询属于给定评论的全部回复，按创建顺序
    async fn replies_of(&self, comment_ids: &[String]) -> Result<Vec<Reply>>;

    /// 邮箱是否已订阅（精确匹配）
    async fn subscriber_exists(&self, email: &str) -> Result<bool>;

    /// 全部订阅邮箱
    async fn subscriber_emails(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl Querier for DBPool {
    async fn posts_page(&self, skip: i64, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY published DESC, id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(self)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn post_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self)
            .await?;
        Ok(count)
    }

    async fn post(&self, id: &str) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 LIMIT 1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn comments_of(&self, post_ids: &[String]) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author, body, created_at
            FROM comments
            WHERE post_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(post_ids)
        .fetch_all(self)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn comment(&self, id: &str) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, author, body, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn replies_of(&self, comment_ids: &[String]) -> Result<Vec<Reply>> {
        let rows = sqlx::query_as::<_, ReplyRow>(
            r#"
            SELECT id, comment_id, author, body, created_at
            FROM replies
            WHERE comment_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(comment_ids)
        .fetch_all(self)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn subscriber_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM subscribers WHERE mail = $1)")
            .bind(email)
            .fetch_one(self)
            .await?;
        Ok(exists)
    }

    async fn subscriber_emails(&self) -> Result<Vec<String>> {
        let emails: Vec<String> = sqlx::query_scalar("SELECT mail FROM subscribers ORDER BY created_at")
            .fetch_all(self)
            .await?;
        Ok(emails)
    }
}
