use uuid::Uuid;

/// 生成一个新的标识符
///
/// 基于 UUIDv7 的 32 位十六进制形式，只包含 `[0-9a-f]`，可直接放入 URL 与文件名。
/// 前缀为毫秒时间戳，因此按生成顺序大致有序。
pub fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}
