//! 主题上下文
//!
//! 显式选择保存在 LocalStorage；没有选择时跟随系统配色并监听其变化。

use leptos::prelude::*;
use maison_shared::theme::{Theme, ThemePreference};

use crate::web::LocalStorage;
use crate::web::media::{apply_dark_class, on_system_theme_change, system_prefers_dark};

#[derive(Clone, Copy)]
pub struct ThemeContext {
    preference: RwSignal<ThemePreference>,
    pub theme: Memo<Theme>,
}

impl ThemeContext {
    pub fn new() -> Self {
        let preference = RwSignal::new(ThemePreference::load(&LocalStorage, system_prefers_dark()));
        let theme = Memo::new(move |_| preference.get().resolve());

        Effect::new(move |_| apply_dark_class(theme.get().is_dark()));

        on_system_theme_change(move |prefers_dark| {
            preference.update(|p| {
                if p.system_changed(prefers_dark) {
                    log::debug!("system theme changed, dark = {}", prefers_dark);
                }
            });
        });

        Self { preference, theme }
    }

    pub fn toggle(&self) {
        self.preference.update(|p| {
            p.toggle(&LocalStorage);
        });
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}
