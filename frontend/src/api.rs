//! 浏览器端的 `ApiClient` 组装与运行时配置来源

use maison_shared::config::{
    VAR_API_BASE, VAR_BANNER_MS, VAR_GEOCODE_BASE, VAR_OAUTH_BASE, VAR_OTP_RESEND_SECS,
    VAR_PASSWORD_BANNER_MS,
};
use maison_shared::{ApiClient, AppConfig};

use crate::web::{BrowserHttpClient, LocalStorage};

/// 前端使用的 REST 客户端：fetch 传输，token 存于 LocalStorage
pub type Api = ApiClient<BrowserHttpClient, LocalStorage>;

/// 读取配置：`<meta name="maison-api-base">` 优先，其次是编译期环境变量
pub fn load_config() -> AppConfig {
    AppConfig::from_lookup(|key| meta_override(key).or_else(|| compile_time(key)))
}

fn compile_time(key: &str) -> Option<String> {
    let value = match key {
        VAR_API_BASE => option_env!("MAISON_API_BASE"),
        VAR_OAUTH_BASE => option_env!("MAISON_OAUTH_BASE"),
        VAR_GEOCODE_BASE => option_env!("MAISON_GEOCODE_BASE"),
        VAR_BANNER_MS => option_env!("MAISON_BANNER_MS"),
        VAR_PASSWORD_BANNER_MS => option_env!("MAISON_PASSWORD_BANNER_MS"),
        VAR_OTP_RESEND_SECS => option_env!("MAISON_OTP_RESEND_SECS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// MAISON_API_BASE -> `<meta name="maison-api-base" content="...">`
fn meta_override(key: &str) -> Option<String> {
    let name = key.to_ascii_lowercase().replace('_', "-");
    let document = web_sys::window()?.document()?;
    document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()??
        .get_attribute("content")
}
