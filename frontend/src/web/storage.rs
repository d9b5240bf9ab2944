//! 浏览器存储封装模块
//!
//! 使用 `web_sys::Storage` 实现共享层的 `KeyValueStore`。
//! token、购物车与主题在 LocalStorage；登录回跳地址在 SessionStorage。

use maison_shared::KeyValueStore;

/// 按存储区域选取 `web_sys::Storage`
fn storage_op<T>(session: bool, op: impl FnOnce(web_sys::Storage) -> Option<T>) -> Option<T> {
    let window = web_sys::window()?;
    let storage = if session {
        window.session_storage().ok()??
    } else {
        window.local_storage().ok()??
    };
    op(storage)
}

/// 本地存储（跨会话持久）
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    /// 键不存在或发生错误时返回 `None`
    fn get(&self, key: &str) -> Option<String> {
        storage_op(false, |s| s.get_item(key).ok()?)
    }

    /// 返回是否写入成功（配额耗尽或隐私模式下可能失败）
    fn set(&self, key: &str, value: &str) -> bool {
        storage_op(false, |s| s.set_item(key, value).ok()).is_some()
    }

    fn delete(&self, key: &str) -> bool {
        storage_op(false, |s| s.remove_item(key).ok()).is_some()
    }
}

/// 会话存储（标签页关闭即清除）
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStorage;

impl KeyValueStore for SessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        storage_op(true, |s| s.get_item(key).ok()?)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        storage_op(true, |s| s.set_item(key, value).ok()).is_some()
    }

    fn delete(&self, key: &str) -> bool {
        storage_op(true, |s| s.remove_item(key).ok()).is_some()
    }
}
