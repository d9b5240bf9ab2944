//! 键值存储抽象
//!
//! 前端由 LocalStorage / SessionStorage 实现，测试使用 `MemoryStore`。
//! 写入均为 best-effort，返回值仅表示是否成功。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::STORAGE_REDIRECT_KEY;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;

    /// 读取并删除（一次性消费）
    fn take(&self, key: &str) -> Option<String> {
        let value = self.get(key);
        if value.is_some() {
            self.delete(key);
        }
        value
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }
}

/// 内存存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.data.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 登录后回跳地址 (one-shot)
// =========================================================

/// 记录受保护页面的原始地址，只接受站内路径
pub fn remember_redirect<S: KeyValueStore>(store: &S, path: &str) -> bool {
    if !is_internal_path(path) {
        return false;
    }
    store.set(STORAGE_REDIRECT_KEY, path)
}

/// 取出回跳地址，读取即清除
pub fn take_redirect<S: KeyValueStore>(store: &S) -> Option<String> {
    store
        .take(STORAGE_REDIRECT_KEY)
        .filter(|path| is_internal_path(path))
}

fn is_internal_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_is_one_shot() {
        let store = MemoryStore::new();
        assert!(remember_redirect(&store, "/checkout"));

        assert_eq!(take_redirect(&store), Some("/checkout".to_string()));
        assert_eq!(take_redirect(&store), None);
    }

    #[test]
    fn test_redirect_rejects_external_targets() {
        let store = MemoryStore::new();
        assert!(!remember_redirect(&store, "https://evil.example"));
        assert!(!remember_redirect(&store, "//evil.example/path"));
        assert_eq!(take_redirect(&store), None);

        // 手工写入的外部地址同样不会被消费为回跳目标
        store.set(STORAGE_REDIRECT_KEY, "//evil.example");
        assert_eq!(take_redirect(&store), None);
        assert!(store.get(STORAGE_REDIRECT_KEY).is_none());
    }

    #[test]
    fn test_memory_store_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v");
        assert_eq!(other.get("k"), Some("v".to_string()));
        other.delete("k");
        assert!(store.is_empty());
    }
}
