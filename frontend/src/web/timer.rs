//! 按秒推进的计时器
//!
//! 重置密码页的重发倒计时靠它驱动：回调每秒执行一次，返回 `false` 时
//! 自行清除 `setInterval`。一次性延时直接用 leptos 的 `set_timeout`。

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

const TICK_MS: i32 = 1000;

/// drop 时清除尚未停止的定时器
pub struct SecondTicker {
    handle: Rc<Cell<Option<i32>>>,
    _closure: Closure<dyn FnMut()>,
}

impl SecondTicker {
    /// 无法获取 window 或浏览器拒绝注册时返回 `None`
    pub fn start<F>(mut on_tick: F) -> Option<Self>
    where
        F: FnMut() -> bool + 'static,
    {
        let handle = Rc::new(Cell::new(None));
        let slot = handle.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            if !on_tick() {
                clear(&slot);
            }
        });

        let id = web_sys::window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TICK_MS,
            )
            .ok()?;
        handle.set(Some(id));

        Some(Self {
            handle,
            _closure: closure,
        })
    }
}

fn clear(slot: &Cell<Option<i32>>) {
    if let (Some(id), Some(window)) = (slot.take(), web_sys::window()) {
        window.clear_interval_with_handle(id);
    }
}

impl Drop for SecondTicker {
    fn drop(&mut self) {
        clear(&self.handle);
    }
}
