use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
};

use super::views::{CommentView, PostPage, ReplyPage};
use crate::{blog::Blog, content::CommentForm, error::Result, state::AppState};

pub(super) fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/blog/{id}", get(show).post(comment))
        .route("/reply/{comment_id}", get(reply_form).post(reply))
}

async fn show(State(blog): State<Blog>, Path(id): Path<String>) -> Result<Html<String>> {
    let post = blog.get_post(&id).await?;
    Ok(Html(PostPage::new(&blog.site().name, &post).render()?))
}

async fn comment(
    State(blog): State<Blog>,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect> {
    let comment = blog.add_comment(&id, &form).await?;
    Ok(Redirect::to(&format!("/blog/{}", comment.post_id)))
}

async fn reply_form(
    State(blog): State<Blog>,
    Path(comment_id): Path<String>,
) -> Result<Html<String>> {
    let comment = blog.get_comment(&comment_id).await?;
    let page = ReplyPage {
        site_name: blog.site().name.clone(),
        post_id: comment.post_id.clone(),
        comment: CommentView::from(&comment),
    };
    Ok(Html(page.render()?))
}

async fn reply(
    State(blog): State<Blog>,
    Path(comment_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect> {
    let (_, post_id) = blog.add_reply(&comment_id, &form).await?;
    Ok(Redirect::to(&format!("/blog/{post_id}")))
}
