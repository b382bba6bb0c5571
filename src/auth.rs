use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// 管理员口令校验
///
/// 只保存一条 Argon2 PHC 格式的哈希，所有管理员共用同一口令。
#[derive(Clone)]
pub struct AdminGate {
    hash: String,
}

impl AdminGate {
    /// 从 PHC 字符串创建，格式不合法时返回错误
    pub fn new(hash: impl Into<String>) -> Result<Self, password_hash::Error> {
        let hash = hash.into();
        PasswordHash::new(&hash)?;
        Ok(Self { hash })
    }

    /// 以明文口令创建，主要用于测试与预览
    pub fn from_secret(secret: &str) -> Result<Self, password_hash::Error> {
        Self::new(hash_secret(secret)?)
    }

    pub fn verify(&self, secret: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// 生成加盐的 Argon2 哈希
pub fn hash_secret(secret: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(secret.as_bytes(), &salt)?
        .to_string())
}
