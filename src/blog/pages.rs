use tracing::instrument;

use super::Blog;
use crate::{content::Post, error::Result, storage::Querier};

/// 每页文章数
pub const PAGE_SIZE: u32 = 8;

/// 第 `page` 页对应的地址，第 0 页为首页
///
/// `/next/{k}` 展示的是第 `k + 1` 页，所以第 `page` 页写作 `/next/{page - 1}`。
pub fn page_location(page: u32) -> String {
    match page {
        0 => "/home".to_string(),
        p => format!("/next/{}", p - 1),
    }
}

impl Blog {
    /// 按发布时间倒序取第 `page` 页（从 0 开始），附带评论与回复
    ///
    /// 超出范围时返回空列表。
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<Post>> {
        let limit = i64::from(PAGE_SIZE);
        let skip = i64::from(page) * limit;

        let posts = self.db.posts_page(skip, limit).await?;
        tracing::debug!(count = posts.len());
        self.attach_comments(posts).await
    }

    /// 最后一个有内容的页号，没有文章时为 0
    #[instrument(skip(self))]
    pub async fn last_page(&self) -> Result<u32> {
        let count = self.db.post_count().await?;
        let last = count.saturating_sub(1).max(0) / i64::from(PAGE_SIZE);
        Ok(u32::try_from(last).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};

    use super::*;
    use crate::{
        blog::testing::harness,
        content::{CommentForm, PostForm},
        storage::{Changeset, Store},
    };

    async fn seed(h: &crate::blog::testing::Harness, count: i64) {
        let mut changes = Changeset::default();
        for i in 0..count {
            let mut post = PostForm {
                title: format!("post {i}"),
                content: "body".into(),
                ..Default::default()
            }
            .into_post(format!("p{i}"), format!("p{i}.png"));
            post.published = Local::now() - Duration::minutes(count - i);
            changes.insert_post(post);
        }
        h.db.commit(changes).await.unwrap();
    }

    #[test]
    fn test_page_location() {
        assert_eq!(page_location(0), "/home");
        assert_eq!(page_location(1), "/next/0");
        assert_eq!(page_location(3), "/next/2");
    }

    #[tokio::test]
    async fn test_fetch_page_bounds_and_order() {
        let h = harness();
        seed(&h, 20).await;

        let mut seen = Vec::new();
        for page in 0..3 {
            let posts = h.blog.fetch_page(page).await.unwrap();
            assert!(posts.len() <= PAGE_SIZE as usize);
            seen.extend(posts);
        }
        assert_eq!(seen.len(), 20);
        assert!(seen.windows(2).all(|w| w[0].published >= w[1].published));
        assert_eq!(seen[0].id, "p19");

        // 一旦为空，之后的页都为空
        assert!(h.blog.fetch_page(3).await.unwrap().is_empty());
        assert!(h.blog.fetch_page(4).await.unwrap().is_empty());
        assert!(h.blog.fetch_page(u32::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_empty_blog() {
        let h = harness();
        assert!(h.blog.fetch_page(0).await.unwrap().is_empty());
        assert_eq!(h.blog.last_page().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_last_page() {
        let h = harness();
        seed(&h, 8).await;
        assert_eq!(h.blog.last_page().await.unwrap(), 0);

        let h = harness();
        seed(&h, 17).await;
        assert_eq!(h.blog.last_page().await.unwrap(), 2);
        assert!(!h.blog.fetch_page(2).await.unwrap().is_empty());
        assert!(h.blog.fetch_page(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_attaches_comments() {
        let h = harness();
        seed(&h, 2).await;
        h.blog
            .add_comment(
                "p0",
                &CommentForm {
                    name: "Alice".into(),
                    body: "nice".into(),
                },
            )
            .await
            .unwrap();

        let posts = h.blog.fetch_page(0).await.unwrap();
        let p0 = posts.iter().find(|p| p.id == "p0").unwrap();
        let p1 = posts.iter().find(|p| p.id == "p1").unwrap();
        assert_eq!(p0.comments.len(), 1);
        assert!(p1.comments.is_empty());
    }
}
