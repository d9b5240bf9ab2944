//! 浏览器定位封装
//!
//! 把 `navigator.geolocation.getCurrentPosition` 的回调接口包装成 future。

use js_sys::{Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// 获取一次当前位置；用户拒绝授权或设备不支持时返回错误文本
pub async fn current_position() -> Result<Coordinates, String> {
    let geolocation = web_sys::window()
        .ok_or("无法获取 window 对象")?
        .navigator()
        .geolocation()
        .map_err(|_| "Geolocation is not supported by this browser".to_string())?;

    let promise = Promise::new(&mut |resolve, reject| {
        let on_success = Closure::once_into_js(move |position: JsValue| {
            let _ = resolve.call1(&JsValue::NULL, &position);
        });
        let reject_cb = reject.clone();
        let on_error = Closure::once_into_js(move |error: JsValue| {
            let _ = reject_cb.call1(&JsValue::NULL, &error);
        });
        if let Err(e) = geolocation.get_current_position_with_error_callback(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
        ) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    let position = JsFuture::from(promise)
        .await
        .map_err(|e| read_string(&e, "message").unwrap_or_else(|| "Unable to get location".into()))?;

    let coords = Reflect::get(&position, &"coords".into()).map_err(|e| format!("{:?}", e))?;
    Ok(Coordinates {
        latitude: read_f64(&coords, "latitude")?,
        longitude: read_f64(&coords, "longitude")?,
    })
}

fn read_f64(target: &JsValue, key: &str) -> Result<f64, String> {
    Reflect::get(target, &key.into())
        .ok()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("position is missing {}", key))
}

fn read_string(target: &JsValue, key: &str) -> Option<String> {
    Reflect::get(target, &key.into()).ok()?.as_string()
}
