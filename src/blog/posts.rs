use std::collections::HashMap;

use tracing::instrument;

use super::Blog;
use crate::{
    content::{Comment, ImageUpload, Post, PostForm, Reply, new_id},
    error::{Error, Result},
    notify::new_post_mail,
    storage::{Changeset, Querier, Store},
};

/// 发布结果
#[derive(Debug)]
pub struct PublishOutcome {
    pub post: Post,
    pub notification: Notification,
}

/// 新文章通知的发送情况
///
/// 通知失败不影响文章的发布。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Sent { recipients: usize },
    NoSubscribers,
    Failed(String),
}

impl Blog {
    /// 按标识查询文章，并附加评论与回复
    #[instrument(skip(self))]
    pub async fn get_post(&self, id: &str) -> Result<Post> {
        let post = self
            .db
            .post(id)
            .await?
            .ok_or_else(|| Error::not_found("post", id))?;

        let mut posts = self.attach_comments(vec![post]).await?;
        posts.pop().ok_or_else(|| Error::not_found("post", id))
    }

    /// 发布新文章
    ///
    /// 1. 逐项校验表单
    /// 2. 校验管理员口令
    /// 3. 保存配图
    /// 4. 写入文章
    /// 5. 尽力通知订阅者，结果记录在 [`PublishOutcome::notification`]
    #[instrument(skip_all, fields(title = %form.title))]
    pub async fn create_post(
        &self,
        form: PostForm,
        image: Option<ImageUpload>,
    ) -> Result<PublishOutcome> {
        form.validate()?;

        let image = image
            .filter(|i| !i.file_name.is_empty())
            .ok_or_else(|| Error::validation("image", "Blog image is required"))?;

        if !self.admin.verify(&form.admin_password) {
            return Err(Error::Unauthorized);
        }

        let id = new_id();
        let image_name = self.images.save(&id, &image.file_name, &image.bytes).await?;
        let post = form.into_post(id, image_name);

        let mut changes = Changeset::default();
        changes.insert_post(post.clone());
        if let Err(e) = self.db.commit(changes).await {
            // 文章未写入，配图不应留在目录中
            if let Err(rm) = self.images.remove(&post.image_name).await {
                tracing::warn!(error = %rm, image = %post.image_name, "removing orphan image failed");
            }
            return Err(e);
        }
        tracing::info!(id = %post.id, "post published");

        let notification = self.notify_subscribers(&post).await;
        Ok(PublishOutcome { post, notification })
    }

    async fn notify_subscribers(&self, post: &Post) -> Notification {
        let recipients = match self.db.subscriber_emails().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "loading subscribers failed");
                return Notification::Failed(e.to_string());
            }
        };

        if recipients.is_empty() {
            return Notification::NoSubscribers;
        }

        let count = recipients.len();
        let mail = new_post_mail(
            &self.site.name,
            &self.site.url,
            recipients,
            &post.id,
            &post.title,
        );

        match self.mailer.send(mail).await {
            Ok(()) => Notification::Sent { recipients: count },
            Err(e) => {
                tracing::warn!(error = %e, id = %post.id, "new post notification failed");
                Notification::Failed(e.to_string())
            }
        }
    }

    /// 为文章列表附加评论，评论再附加回复
    pub(super) async fn attach_comments(&self, posts: Vec<Post>) -> Result<Vec<Post>> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let comments = self.db.comments_of(&post_ids).await?;

        let comment_ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let replies = if comment_ids.is_empty() {
            Vec::new()
        } else {
            self.db.replies_of(&comment_ids).await?
        };

        Ok(assemble(posts, comments, replies))
    }
}

/// 将独立存储的评论与回复组装为树，保持各自的原有顺序
pub fn assemble(mut posts: Vec<Post>, comments: Vec<Comment>, replies: Vec<Reply>) -> Vec<Post> {
    let mut replies_by_comment: HashMap<String, Vec<Reply>> = HashMap::new();
    for reply in replies {
        replies_by_comment
            .entry(reply.comment_id.clone())
            .or_default()
            .push(reply);
    }

    let mut comments_by_post: HashMap<String, Vec<Comment>> = HashMap::new();
    for mut comment in comments {
        comment.replies = replies_by_comment.remove(&comment.id).unwrap_or_default();
        comments_by_post
            .entry(comment.post_id.clone())
            .or_default()
            .push(comment);
    }

    for post in &mut posts {
        post.comments = comments_by_post.remove(&post.id).unwrap_or_default();
    }
    posts
}
