//! 启动配置
//!
//! 先读取 `INKPOST_CONFIG` 指向的 TOML 文件（可选），再由环境变量覆盖。
use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::notify::SmtpSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} not set")]
    Missing(&'static str),
}

/// 存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Postgres,
    /// 进程内存储，重启丢失，仅用于预览
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub storage: StorageKind,
    pub database_url: Option<String>,
    /// Argon2 PHC 字符串，由 `hash-password` 生成
    pub admin_password_hash: String,
    pub site_name: String,
    pub site_url: String,
    pub email_validator_access_key: String,
    pub smtp: SmtpSettings,
    pub image_dir: PathBuf,
    pub assets_dir: PathBuf,
    /// 请求体上限，字节
    pub upload_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            storage: StorageKind::default(),
            database_url: None,
            admin_password_hash: String::new(),
            site_name: "Inkpost".to_string(),
            site_url: "http://localhost:8080".to_string(),
            email_validator_access_key: String::new(),
            smtp: SmtpSettings::default(),
            image_dir: PathBuf::from("uploads"),
            assets_dir: PathBuf::from("assets"),
            upload_limit: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// 从配置文件与进程环境加载
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var_os("INKPOST_CONFIG") {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };

        let config = config.merge_env(|key| env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 用 `var` 查到的环境变量覆盖对应字段
    pub fn merge_env<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("PORT") {
            let port: u16 = parse("PORT", &port)?;
            self.listen = format!("0.0.0.0:{port}");
        }
        if let Some(listen) = var("INKPOST_LISTEN") {
            self.listen = listen;
        }
        if let Some(storage) = var("INKPOST_STORAGE") {
            self.storage = match storage.to_ascii_lowercase().as_str() {
                "postgres" => StorageKind::Postgres,
                "memory" => StorageKind::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "INKPOST_STORAGE",
                        value: storage,
                    });
                }
            };
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = Some(url);
        }

        let strings = [
            ("ADMIN_PASSWORD_HASH", &mut self.admin_password_hash),
            ("SITE_NAME", &mut self.site_name),
            ("SITE_URL", &mut self.site_url),
            ("EMAIL_VALIDATOR_ACCESS_KEY", &mut self.email_validator_access_key),
            ("SMTP_HOST", &mut self.smtp.host),
            ("SMTP_USERNAME", &mut self.smtp.username),
            ("SMTP_PASSWORD", &mut self.smtp.password),
            ("MAIL_FROM", &mut self.smtp.from),
        ];
        for (key, field) in strings {
            if let Some(value) = var(key) {
                *field = value;
            }
        }

        if let Some(port) = var("SMTP_PORT") {
            self.smtp.port = parse("SMTP_PORT", &port)?;
        }
        if let Some(name) = var("MAIL_FROM_NAME") {
            self.smtp.from_name = Some(name);
        }
        if let Some(dir) = var("IMAGE_DIR") {
            self.image_dir = dir.into();
        }
        if let Some(dir) = var("ASSETS_DIR") {
            self.assets_dir = dir.into();
        }
        if let Some(limit) = var("UPLOAD_LIMIT") {
            self.upload_limit = parse("UPLOAD_LIMIT", &limit)?;
        }

        // 站点地址用于拼接链接
        while self.site_url.ends_with('/') {
            self.site_url.pop();
        }

        Ok(self)
    }

    /// 检查必填项
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.storage == StorageKind::Postgres && self.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let required = [
            ("ADMIN_PASSWORD_HASH", &self.admin_password_hash),
            ("EMAIL_VALIDATOR_ACCESS_KEY", &self.email_validator_access_key),
            ("SMTP_HOST", &self.smtp.host),
            ("MAIL_FROM", &self.smtp.from),
        ];
        match required.into_iter().find(|(_, v)| v.trim().is_empty()) {
            Some((key, _)) => Err(ConfigError::Missing(key)),
            None => Ok(()),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
