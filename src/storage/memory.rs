use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Change, Changeset, Querier, Store};
use crate::{
    content::{Comment, Post, Reply, Subscriber},
    error::Result,
};

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    replies: Vec<Reply>,
    subscribers: Vec<Subscriber>,
}

/// 进程内存储
///
/// 用于测试与 `storage = "memory"` 预览模式，重启即丢失。
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Querier for MemoryDb {
    async fn posts_page(&self, skip: i64, limit: i64) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.iter().collect();
        // 与 PostgreSQL 一致：发布时间倒序，相同时按 id
        posts.sort_by(|a, b| b.published.cmp(&a.published).then_with(|| a.id.cmp(&b.id)));

        Ok(posts
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn post_count(&self) -> Result<i64> {
        Ok(self.tables.read().await.posts.len() as i64)
    }

    async fn post(&self, id: &str) -> Result<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn comments_of(&self, post_ids: &[String]) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect())
    }

    async fn comment(&self, id: &str) -> Result<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn replies_of(&self, comment_ids: &[String]) -> Result<Vec<Reply>> {
        let tables = self.tables.read().await;
        Ok(tables
            .replies
            .iter()
            .filter(|r| comment_ids.contains(&r.comment_id))
            .cloned()
            .collect())
    }

    async fn subscriber_exists(&self, email: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.subscribers.iter().any(|s| s.email == email))
    }

    async fn subscriber_emails(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables.subscribers.iter().map(|s| s.email.clone()).collect())
    }
}

#[async_trait]
impl Store for MemoryDb {
    async fn commit(&self, changes: Changeset) -> Result<()> {
        let mut tables = self.tables.write().await;

        for change in changes.into_changes() {
            match change {
                Change::Post(post) => tables.posts.push(post),
                Change::Comment(comment) => tables.comments.push(comment),
                Change::Reply(reply) => tables.replies.push(reply),
                Change::Subscriber(subscriber) => {
                    if !tables.subscribers.iter().any(|s| s.email == subscriber.email) {
                        tables.subscribers.push(subscriber);
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};

    use super::*;

    fn post(id: &str, minutes_ago: i64) -> Post {
        Post {
            id: id.to_string(),
            title: format!("post {id}"),
            published: Local::now() - Duration::minutes(minutes_ago),
            read_time: 0,
            content: String::new(),
            image_name: String::new(),
            bullet_heading: None,
            bullet_points: Vec::new(),
            quote_heading: None,
            quote: None,
            quote_author: None,
            video_path: None,
            comments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_posts_page_orders_newest_first() {
        let db = MemoryDb::new();
        let mut changes = Changeset::default();
        changes
            .insert_post(post("old", 30))
            .insert_post(post("new", 1))
            .insert_post(post("mid", 10));
        db.commit(changes).await.unwrap();

        let ids: Vec<String> = db
            .posts_page(0, 8)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        let ids: Vec<String> = db
            .posts_page(1, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["mid"]);
        assert!(db.posts_page(3, 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_equal_timestamps_page_disjointly() {
        let db = MemoryDb::new();
        let published = Local::now();
        let mut changes = Changeset::default();
        for id in ["c", "a", "b"] {
            let mut p = post(id, 0);
            p.published = published;
            changes.insert_post(p);
        }
        db.commit(changes).await.unwrap();

        let mut ids = Vec::new();
        for skip in 0..3 {
            let page = db.posts_page(skip, 1).await.unwrap();
            ids.extend(page.into_iter().map(|p| p.id));
        }
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(db.post_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_subscriber_insert_is_idempotent() {
        let db = MemoryDb::new();
        let mut changes = Changeset::default();
        changes
            .insert_subscriber(Subscriber::new("reader@example.com"))
            .insert_subscriber(Subscriber::new("reader@example.com"));
        db.commit(changes).await.unwrap();

        assert!(db.subscriber_exists("reader@example.com").await.unwrap());
        assert!(!db.subscriber_exists("Reader@example.com").await.unwrap());
        assert_eq!(db.subscriber_emails().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_children_lookup() {
        let db = MemoryDb::new();
        let comment = Comment::new("p1", "Alice".into(), "hi".into());
        let reply = Reply::new(&comment.id, "Bob".into(), "hello".into());
        let other = Comment::new("p2", "Carol".into(), "yo".into());

        let mut changes = Changeset::default();
        changes
            .insert_comment(comment.clone())
            .insert_comment(other)
            .insert_reply(reply);
        db.commit(changes).await.unwrap();

        let comments = db.comments_of(&["p1".to_string()]).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "Alice");

        let replies = db.replies_of(&[comment.id.clone()]).await.unwrap();
        assert_eq!(replies.len(), 1);
        assert!(db.comment(&comment.id).await.unwrap().is_some());
        assert!(db.comment("missing").await.unwrap().is_none());
    }
}
