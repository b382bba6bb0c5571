pub mod auth;
pub mod blog;
pub mod config;
pub mod content;
pub mod error;
pub mod media;
pub mod notify;
pub mod state;
pub mod storage;
pub mod web;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use blog::{Blog, Site};
use config::{Config, ConfigError, StorageKind};
use state::{AppState, WebSettings};
use storage::{Database, MemoryDb};

/// 启动失败的原因
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid ADMIN_PASSWORD_HASH: {0}")]
    AdminHash(argon2::password_hash::Error),

    #[error(transparent)]
    Service(#[from] error::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("INKPOST_LOG"))
        .init();

    if let Err(e) = serve().await {
        tracing::error!(error = %e, "inkpost stopped");
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), StartupError> {
    let config = Config::load()?;

    let db = open_storage(&config).await?;
    let mailer = Arc::new(notify::SmtpMailer::new(&config.smtp)?);
    let checker = Arc::new(notify::MailboxLayer::new(&config.email_validator_access_key)?);
    let admin = auth::AdminGate::new(config.admin_password_hash.clone())
        .map_err(StartupError::AdminHash)?;

    let blog = Blog::new(
        db,
        mailer,
        checker,
        media::ImageStore::new(config.image_dir.clone()),
        admin,
        Site {
            name: config.site_name.clone(),
            url: config.site_url.clone(),
        },
    );
    let web = WebSettings::new(&config.assets_dir, &config.image_dir, config.upload_limit);

    web::run_server(AppState::new(blog, web), &config.listen).await?;
    Ok(())
}

/// 按配置选择存储后端，PostgreSQL 在连接后执行建表脚本
async fn open_storage(config: &Config) -> Result<Arc<dyn Database>, StartupError> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage, data is lost on restart");
            Ok(Arc::new(MemoryDb::new()))
        }
        StorageKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let db = storage::connect(url).await?;
            storage::migrate(&db, storage::SCHEMA).await?;
            tracing::info!("database ready");
            Ok(Arc::new(db))
        }
    }
}
