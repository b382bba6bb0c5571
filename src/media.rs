use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// 允许上传的图片扩展名
pub const ALLOWED_EXTENSIONS: [&str; 3] = [".jpeg", ".jpg", ".png"];

/// 本地图片存储
///
/// 文件以 `{id}{ext}` 命名写入同一目录，依靠标识唯一性避免冲突。
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 保存图片并返回存储的文件名
    #[tracing::instrument(name = "store image", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, id: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        let ext = extension(file_name).ok_or_else(|| {
            Error::validation("image", "Unaccepted image, only .jpeg, .png, .jpg")
        })?;

        if bytes.is_empty() {
            return Err(Error::validation("image", "Blog image is required"));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let name = format!("{id}{ext}");
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        Ok(name)
    }

    /// 删除已保存的图片，文件不存在时视为成功
    #[tracing::instrument(name = "remove image", skip(self))]
    pub async fn remove(&self, name: &str) -> Result<()> {
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// 返回小写的可接受扩展名（含 `.`），不可接受时为 `None`
fn extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .into_iter()
        .find(|allowed| allowed[1..] == ext)
}
