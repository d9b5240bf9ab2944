//! 组件卸载后丢弃迟到的异步结果

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::cancel::CancelToken;

/// 返回与当前组件同生命周期的取消标记，组件清理时自动取消
pub fn use_cancel_token() -> CancelToken {
    let token = CancelToken::new();
    let on_unmount = token.clone();
    on_cleanup(move || on_unmount.cancel());
    token
}

/// 启动异步任务；只有组件仍然挂载时才把结果交给 `apply`
pub fn spawn_guarded<T, F, A>(token: &CancelToken, task: F, apply: A)
where
    T: 'static,
    F: Future<Output = T> + 'static,
    A: FnOnce(T) + 'static,
{
    let token = token.clone();
    spawn_local(async move {
        let result = task.await;
        match token.guard(result) {
            Some(result) => apply(result),
            None => log::debug!("discarding response for unmounted view"),
        }
    });
}
