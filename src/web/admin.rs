use askama::Template;
use axum::{
    Router,
    extract::{Multipart, State},
    response::Html,
    routing::get,
};

use super::views::NewPostPage;
use crate::{
    blog::{Blog, Notification},
    content::{ImageUpload, PostForm},
    error::Result,
    state::AppState,
};

pub(super) fn setup_route() -> Router<AppState> {
    Router::new().route("/admin/new", get(new_post).post(publish))
}

async fn new_post(State(blog): State<Blog>) -> Result<Html<String>> {
    let page = NewPostPage {
        site_name: blog.site().name.clone(),
        message: String::new(),
        notice: String::new(),
        post_id: String::new(),
    };
    Ok(Html(page.render()?))
}

async fn publish(State(blog): State<Blog>, multipart: Multipart) -> Result<Html<String>> {
    let (form, image) = read_form(multipart).await?;
    let published = blog.create_post(form, image).await?;

    let notice = match published.notification {
        Notification::Sent { recipients } => format!("{recipients} subscriber(s) notified"),
        Notification::NoSubscribers => "No subscribers to notify".to_string(),
        Notification::Failed(_) => "Notifying subscribers failed".to_string(),
    };

    let page = NewPostPage {
        site_name: blog.site().name.clone(),
        message: "Post added".to_string(),
        notice,
        post_id: published.post.id,
    };
    Ok(Html(page.render()?))
}

/// 读取发布表单，`image` 字段为配图，其余为文本
async fn read_form(mut multipart: Multipart) -> Result<(PostForm, Option<ImageUpload>)> {
    let mut form = PostForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            image = Some(ImageUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await?;
        let slot = match name.as_str() {
            "title" => &mut form.title,
            "content" => &mut form.content,
            "bullet_heading" => &mut form.bullet_heading,
            "bullet_points" => &mut form.bullet_points,
            "quote_heading" => &mut form.quote_heading,
            "quote" => &mut form.quote,
            "quote_author" => &mut form.quote_author,
            "video_path" => &mut form.video_path,
            "admin_password" => &mut form.admin_password,
            other => {
                tracing::debug!(field = other, "ignored form field");
                continue;
            }
        };
        *slot = value;
    }

    Ok((form, image))
}
