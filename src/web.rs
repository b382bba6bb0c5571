//! HTTP 层
//!
//! 服务端渲染页面，表单提交成功后以 303 重定向。
mod admin;
mod pages;
mod posts;
pub mod views;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::instrument;

use crate::state::AppState;

/// 设置应用的路由。
///
/// 页面、文章与管理入口三组路由，加上 `/assets`、`/uploads` 与 `/favicon.ico` 静态文件。
pub fn setup_route(app: AppState) -> Router {
    let web = app.web().clone();

    Router::new()
        .merge(pages::setup_route())
        .merge(posts::setup_route())
        .merge(admin::setup_route())
        .nest_service("/assets", ServeDir::new(&web.assets_dir))
        .nest_service("/uploads", ServeDir::new(&web.image_dir))
        .route_service(
            "/favicon.ico",
            ServeFile::new(web.assets_dir.join("favicon.ico")),
        )
        .layer(DefaultBodyLimit::max(web.upload_limit))
        .with_state(app)
}

/// 启动 HTTP 服务，并使用给定的路由处理请求。
#[instrument(name = "http server", skip(router))]
pub async fn run_server_with_router(router: Router, listen: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志和追踪中间件
/// 3. 启动服务器
pub async fn run_server(app: AppState, listen: &str) -> std::io::Result<()> {
    let router = setup_route(app);
    let router = add_middlewares(router);
    run_server_with_router(router, listen).await
}

/// 为路由添加中间件，包括请求追踪和失败日志记录。
fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(
        TraceLayer::new_for_http()
            .on_failure(log_failure)
            .on_request(|_req: &_, _span: &tracing::Span| {
                // 空实现，关闭请求日志
            }),
    )
}
