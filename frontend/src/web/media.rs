//! 系统配色偏好与 `<html>` 的 dark 类

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MediaQueryListEvent;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn dark_query() -> Option<web_sys::MediaQueryList> {
    web_sys::window()?.match_media(DARK_QUERY).ok()?
}

pub fn system_prefers_dark() -> bool {
    dark_query().is_some_and(|q| q.matches())
}

/// 监听系统配色变化，监听器与页面同生命周期
pub fn on_system_theme_change<F>(callback: F)
where
    F: Fn(bool) + 'static,
{
    let Some(query) = dark_query() else {
        return;
    };
    let closure = Closure::<dyn Fn(MediaQueryListEvent)>::new(move |ev: MediaQueryListEvent| {
        callback(ev.matches());
    });
    let _ = query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());

    // 泄漏闭包以保持监听器存活
    closure.forget();
}

pub fn apply_dark_class(is_dark: bool) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        let _ = root.class_list().toggle_with_force("dark", is_dark);
        // daisyUI 组件按 data-theme 取色
        let _ = root.set_attribute("data-theme", if is_dark { "dark" } else { "light" });
    }
}
