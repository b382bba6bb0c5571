use async_trait::async_trait;

use super::DBPool;
use crate::{
    content::{Comment, Post, Reply, Subscriber},
    error::Result,
};

/// 一条待写入的记录
#[derive(Debug)]
pub enum Change {
    Post(Post),
    Comment(Comment),
    Reply(Reply),
    Subscriber(Subscriber),
}

/// 待提交的一组写入
///
/// ```ignore
/// let mut changes = Changeset::default();
/// changes.insert_comment(comment);
/// db.commit(changes).await?;
/// ```
#[derive(Debug, Default)]
pub struct Changeset {
    changes: Vec<Change>,
}

impl Changeset {
    pub fn insert_post(&mut self, post: Post) -> &mut Self {
        self.changes.push(Change::Post(post));
        self
    }

    pub fn insert_comment(&mut self, comment: Comment) -> &mut Self {
        self.changes.push(Change::Comment(comment));
        self
    }

    pub fn insert_reply(&mut self, reply: Reply) -> &mut Self {
        self.changes.push(Change::Reply(reply));
        self
    }

    /// 邮箱已存在时忽略
    pub fn insert_subscriber(&mut self, subscriber: Subscriber) -> &mut Self {
        self.changes.push(Change::Subscriber(subscriber));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

/// 写入接口
#[async_trait]
pub trait Store: Send + Sync {
    /// 在单个事务中提交全部写入，任一失败则整体回滚
    async fn commit(&self, changes: Changeset) -> Result<()>;
}

#[async_trait]
impl Store for DBPool {
    async fn commit(&self, changes: Changeset) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.begin().await?;

        for change in changes.into_changes() {
            match change {
                Change::Post(post) => {
                    sqlx::query(
                        r#"
                        INSERT INTO posts
                            (id, title, published, read_time, content, image_name,
                             bullet_heading, bullet_points, quote_heading, quote, quote_author, video_path)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                        "#,
                    )
                    .bind(post.id)
                    .bind(post.title)
                    .bind(post.published)
                    .bind(post.read_time)
                    .bind(post.content)
                    .bind(post.image_name)
                    .bind(post.bullet_heading)
                    .bind(post.bullet_points)
                    .bind(post.quote_heading)
                    .bind(post.quote)
                    .bind(post.quote_author)
                    .bind(post.video_path)
                    .execute(tx.as_mut())
                    .await?;
                }

                Change::Comment(comment) => {
                    sqlx::query(
                        "INSERT INTO comments (id, post_id, author, body, created_at) VALUES ($1, $2, $3, $4, $5)",
                    )
                    .bind(comment.id)
                    .bind(comment.post_id)
                    .bind(comment.author)
                    .bind(comment.body)
                    .bind(comment.created_at)
                    .execute(tx.as_mut())
                    .await?;
                }

                Change::Reply(reply) => {
                    sqlx::query(
                        "INSERT INTO replies (id, comment_id, author, body, created_at) VALUES ($1, $2, $3, $4, $5)",
                    )
                    .bind(reply.id)
                    .bind(reply.comment_id)
                    .bind(reply.author)
                    .bind(reply.body)
                    .bind(reply.created_at)
                    .execute(tx.as_mut())
                    .await?;
                }

                Change::Subscriber(subscriber) => {
                    sqlx::query(
                        r#"
                        INSERT INTO subscribers (id, mail, created_at)
                        VALUES ($1, $2, $3)
                        ON CONFLICT (mail) DO NOTHING
                        "#,
                    )
                    .bind(subscriber.id)
                    .bind(subscriber.email)
                    .bind(subscriber.created_at)
                    .execute(tx.as_mut())
                    .await?;
                }
            }
        }

        Ok(tx.commit().await?)
    }
}
