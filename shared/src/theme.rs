//! 主题偏好
//!
//! 存储中的显式选择优先；没有选择时跟随系统。

use crate::STORAGE_THEME_KEY;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    /// 用户显式选择的主题
    pub stored: Option<Theme>,
    pub system_prefers_dark: bool,
}

impl ThemePreference {
    pub fn load<S: KeyValueStore>(store: &S, system_prefers_dark: bool) -> Self {
        Self {
            stored: store.get(STORAGE_THEME_KEY).as_deref().and_then(Theme::parse),
            system_prefers_dark,
        }
    }

    pub fn resolve(&self) -> Theme {
        self.stored.unwrap_or(if self.system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        })
    }

    /// 切换并持久化为显式选择
    pub fn toggle<S: KeyValueStore>(&mut self, store: &S) -> Theme {
        let next = self.resolve().toggled();
        self.stored = Some(next);
        if !store.set(STORAGE_THEME_KEY, next.as_str()) {
            log::warn!("failed to persist theme override");
        }
        next
    }

    /// 系统主题变化；返回生效主题是否改变
    pub fn system_changed(&mut self, prefers_dark: bool) -> bool {
        let before = self.resolve();
        self.system_prefers_dark = prefers_dark;
        self.resolve() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_system_preference_without_override() {
        let store = MemoryStore::new();
        let pref = ThemePreference::load(&store, true);
        assert_eq!(pref.resolve(), Theme::Dark);
    }

    #[test]
    fn test_override_wins_and_blocks_system_changes() {
        let store = MemoryStore::new();
        let mut pref = ThemePreference::load(&store, false);

        assert_eq!(pref.toggle(&store), Theme::Dark);
        assert_eq!(store.get(STORAGE_THEME_KEY).as_deref(), Some("dark"));

        assert!(!pref.system_changed(false));
        assert_eq!(pref.resolve(), Theme::Dark);

        let reloaded = ThemePreference::load(&store, false);
        assert_eq!(reloaded.resolve(), Theme::Dark);
    }

    #[test]
    fn test_system_change_applies_when_no_override() {
        let store = MemoryStore::new();
        let mut pref = ThemePreference::load(&store, false);
        assert!(pref.system_changed(true));
        assert_eq!(pref.resolve(), Theme::Dark);
    }

    #[test]
    fn test_garbage_stored_value_is_ignored() {
        let store = MemoryStore::new();
        store.set(STORAGE_THEME_KEY, "sepia");
        assert_eq!(ThemePreference::load(&store, true).resolve(), Theme::Dark);
    }
}
