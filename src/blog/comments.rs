use tracing::instrument;

use super::Blog;
use crate::{
    content::{Comment, CommentForm, Reply, is_duplicate},
    error::{Error, Result, Submission},
    storage::{Changeset, Querier, Store},
};

impl Blog {
    /// 查询评论及其回复
    #[instrument(skip(self))]
    pub async fn get_comment(&self, id: &str) -> Result<Comment> {
        let mut comment = self
            .db
            .comment(id)
            .await?
            .ok_or_else(|| Error::not_found("comment", id))?;

        comment.replies = self.db.replies_of(&[comment.id.clone()]).await?;
        Ok(comment)
    }

    /// 为文章添加评论
    ///
    /// 同一文章下，规范化后作者与正文都相同的评论视为重复。
    /// 检查与写入之间不加锁，并发的相同提交可能同时成功。
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn add_comment(&self, post_id: &str, form: &CommentForm) -> Result<Comment> {
        form.validate()?;

        if self.db.post(post_id).await?.is_none() {
            return Err(Error::not_found("post", post_id));
        }

        let (author, body) = form.escaped();
        let existing = self.db.comments_of(&[post_id.to_string()]).await?;
        if is_duplicate(&existing, &author, &body) {
            return Err(Error::Duplicate(Submission::Comment));
        }

        let comment = Comment::new(post_id, author, body);
        let mut changes = Changeset::default();
        changes.insert_comment(comment.clone());
        self.db.commit(changes).await?;

        Ok(comment)
    }

    /// 回复评论，返回回复及其所属文章的标识
    ///
    /// 重复检测仅限同一评论下的回复。
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn add_reply(&self, comment_id: &str, form: &CommentForm) -> Result<(Reply, String)> {
        form.validate()?;

        let comment = self
            .db
            .comment(comment_id)
            .await?
            .ok_or_else(|| Error::not_found("comment", comment_id))?;

        let (author, body) = form.escaped();
        let existing = self.db.replies_of(&[comment.id.clone()]).await?;
        if is_duplicate(&existing, &author, &body) {
            return Err(Error::Duplicate(Submission::Reply));
        }

        let reply = Reply::new(&comment.id, author, body);
        let mut changes = Changeset::default();
        changes.insert_reply(reply.clone());
        self.db.commit(changes).await?;

        Ok((reply, comment.post_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blog::testing::{Harness, harness},
        content::PostForm,
        error::ErrorKind,
    };

    fn form(name: &str, body: &str) -> CommentForm {
        CommentForm {
            name: name.into(),
            body: body.into(),
        }
    }

    async fn seed_post(h: &Harness, id: &str) {
        let post = PostForm {
            title: "t".into(),
            content: "c".into(),
            ..Default::default()
        }
        .into_post(id.into(), format!("{id}.png"));
        let mut changes = Changeset::default();
        changes.insert_post(post);
        h.db.commit(changes).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_comment_is_normalized() {
        let h = harness();
        seed_post(&h, "p1").await;

        h.blog
            .add_comment("p1", &form("Alice", "Great post"))
            .await
            .unwrap();
        let err = h
            .blog
            .add_comment("p1", &form(" alice ", "GREAT POST"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateSubmission);
        assert_eq!(h.db.comments_of(&["p1".to_string()]).await.unwrap().len(), 1);

        // 其他文章不受影响
        seed_post(&h, "p2").await;
        h.blog
            .add_comment("p2", &form("Alice", "Great post"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_is_escaped() {
        let h = harness();
        seed_post(&h, "p1").await;

        let comment = h
            .blog
            .add_comment("p1", &form("Mallory", "<script>alert(1)</script>"))
            .await
            .unwrap();
        assert!(!comment.body.contains('<'));
        assert!(comment.body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_comment_validation() {
        let h = harness();
        seed_post(&h, "p1").await;

        let err = h
            .blog
            .add_comment("p1", &form("A", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));

        let err = h.blog.add_comment("p1", &form("Alice", "")).await.unwrap_err();
        assert!(matches!(err, Error::Validation { field: "body", .. }));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let h = harness();
        let err = h
            .blog
            .add_comment("missing", &form("Alice", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_reply_duplicates_scoped_to_comment() {
        let h = harness();
        seed_post(&h, "p1").await;
        let first = h.blog.add_comment("p1", &form("Alice", "one")).await.unwrap();
        let second = h.blog.add_comment("p1", &form("Alice", "two")).await.unwrap();

        let (reply, post_id) = h
            .blog
            .add_reply(&first.id, &form("Bob", "agreed"))
            .await
            .unwrap();
        assert_eq!(post_id, "p1");
        assert_eq!(reply.comment_id, first.id);

        let err = h
            .blog
            .add_reply(&first.id, &form("BOB", " agreed "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateSubmission);

        // 同样的内容回复另一条评论是允许的
        h.blog
            .add_reply(&second.id, &form("Bob", "agreed"))
            .await
            .unwrap();

        let loaded = h.blog.get_comment(&first.id).await.unwrap();
        assert_eq!(loaded.replies.len(), 1);
    }

    #[tokio::test]
    async fn test_reply_to_missing_comment() {
        let h = harness();
        let err = h
            .blog
            .add_reply("missing", &form("Bob", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            h.blog.get_comment("missing").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
