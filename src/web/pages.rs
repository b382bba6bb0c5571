use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use super::views::{AboutPage, IndexPage};
use crate::{
    blog::{Blog, page_location},
    content::Post,
    error::Result,
    state::AppState,
};

pub(super) fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/", get(visit))
        .route("/home", get(home).post(subscribe))
        .route("/next/{page}", get(next).post(subscribe))
        .route("/previous/{page}", get(previous).post(subscribe))
        .route("/about", get(about).post(subscribe))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubscribeForm {
    email: String,
}

async fn visit() -> Redirect {
    Redirect::to("/home")
}

async fn home(State(blog): State<Blog>) -> Result<Response> {
    let posts = blog.fetch_page(0).await?;
    render_index(&blog, 0, posts)
}

/// `/next/{page}` 展示第 `page + 1` 页，为空时直接跳到最后一个有内容的页
async fn next(State(blog): State<Blog>, Path(page): Path<u32>) -> Result<Response> {
    if let Some(target) = page.checked_add(1) {
        let posts = blog.fetch_page(target).await?;
        if !posts.is_empty() {
            return render_index(&blog, target, posts);
        }
    }

    let last = blog.last_page().await?;
    Ok(Redirect::to(&page_location(last)).into_response())
}

/// `/previous/{page}` 展示第 `page - 1` 页，到第 0 页时回到首页
async fn previous(State(blog): State<Blog>, Path(page): Path<u32>) -> Result<Response> {
    match page.checked_sub(1) {
        Some(target) if target >= 1 => {
            let posts = blog.fetch_page(target).await?;
            render_index(&blog, target, posts)
        }
        _ => Ok(Redirect::to("/home").into_response()),
    }
}

async fn about(State(blog): State<Blog>) -> Result<Html<String>> {
    let page = AboutPage {
        site_name: blog.site().name.clone(),
    };
    Ok(Html(page.render()?))
}

/// 各列表页与关于页共用的订阅表单，成功后回到原地址
async fn subscribe(
    State(blog): State<Blog>,
    uri: Uri,
    Form(form): Form<SubscribeForm>,
) -> Result<Redirect> {
    blog.subscribe(&form.email).await?;
    Ok(Redirect::to(uri.path()))
}

fn render_index(blog: &Blog, page: u32, posts: Vec<Post>) -> Result<Response> {
    let page = IndexPage::new(&blog.site().name, page, &posts);
    Ok(Html(page.render()?).into_response())
}
