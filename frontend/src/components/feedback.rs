//! 内联反馈：错误提示、自动消失的成功横幅、加载占位
//!
//! 所有异步失败都落到页面内的提示上，不使用阻塞式 alert。

use std::time::Duration;

use leptos::prelude::*;

use crate::components::icons::{AlertCircle, Check};

/// 显示一条成功消息，`after` 之后自动清除（若期间未被覆盖）
pub fn flash(target: RwSignal<Option<String>>, text: impl Into<String>, after: Duration) {
    let text = text.into();
    target.set(Some(text.clone()));
    set_timeout(
        move || {
            if target.with_untracked(|current| current.as_deref() == Some(text.as_str())) {
                target.set(None);
            }
        },
        after,
    );
}

#[component]
pub fn InlineError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <AlertCircle attr:class="h-5 w-5 shrink-0" />
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn SuccessBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="status" class="alert alert-success text-sm py-2">
                <Check attr:class="h-5 w-5 shrink-0" />
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn LoadingBlock(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center gap-3 py-24 text-base-content/60">
            <span class="loading loading-spinner loading-lg"></span>
            {label.map(|l| view! { <p class="text-sm tracking-widest uppercase">{l}</p> })}
        </div>
    }
}
