use std::{path::Path, sync::Arc};

use axum::extract::FromRef;

use crate::blog::Blog;

/// 路由层需要的静态资源与上传设置
#[derive(Debug, Clone)]
pub struct WebSettings {
    pub assets_dir: Arc<Path>,
    pub image_dir: Arc<Path>,
    /// 请求体上限，字节
    pub upload_limit: usize,
}

impl WebSettings {
    pub fn new(assets_dir: impl AsRef<Path>, image_dir: impl AsRef<Path>, upload_limit: usize) -> Self {
        Self {
            assets_dir: Arc::from(assets_dir.as_ref()),
            image_dir: Arc::from(image_dir.as_ref()),
            upload_limit,
        }
    }
}

/// 应用程序上下文
///
/// [`AppState`] 封装了博客服务与路由设置，处理函数通过 [`FromRef`] 直接提取 [`Blog`]。
#[derive(Clone, FromRef)]
pub struct AppState {
    blog: Blog,
    web: WebSettings,
}

impl AppState {
    pub fn new(blog: Blog, web: WebSettings) -> Self {
        Self { blog, web }
    }

    /// 获取博客服务
    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    pub fn web(&self) -> &WebSettings {
        &self.web
    }
}
