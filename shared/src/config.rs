//! 运行时配置 (Runtime Configuration)
//!
//! 通过查找函数读取具名变量，读不到或解析失败时使用默认值。
//! 前端以 `option_env!` 与 `<meta>` 标签作为变量来源。

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_GEOCODE_BASE: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_BANNER_MS: u64 = 2500;
pub const DEFAULT_PASSWORD_BANNER_MS: u64 = 3000;
pub const DEFAULT_OTP_RESEND_SECS: u32 = 60;

pub const VAR_API_BASE: &str = "MAISON_API_BASE";
pub const VAR_OAUTH_BASE: &str = "MAISON_OAUTH_BASE";
pub const VAR_GEOCODE_BASE: &str = "MAISON_GEOCODE_BASE";
pub const VAR_BANNER_MS: &str = "MAISON_BANNER_MS";
pub const VAR_PASSWORD_BANNER_MS: &str = "MAISON_PASSWORD_BANNER_MS";
pub const VAR_OTP_RESEND_SECS: &str = "MAISON_OTP_RESEND_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST 后端根地址
    pub api_base: String,
    /// OAuth 授权入口所在地址（默认与 api_base 相同）
    pub oauth_base: String,
    /// 逆地理编码服务地址
    pub geocode_base: String,
    /// 成功提示自动消失时间
    pub banner_ms: u64,
    /// 修改密码成功提示的停留时间
    pub password_banner_ms: u64,
    /// 重发 OTP 的倒计时
    pub otp_resend_secs: u32,
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base = url(VAR_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let oauth_base = url(VAR_OAUTH_BASE).unwrap_or_else(|| api_base.clone());
        let geocode_base =
            url(VAR_GEOCODE_BASE).unwrap_or_else(|| DEFAULT_GEOCODE_BASE.to_string());

        Self {
            api_base,
            oauth_base,
            geocode_base,
            banner_ms: parse_or(&lookup, VAR_BANNER_MS, DEFAULT_BANNER_MS),
            password_banner_ms: parse_or(
                &lookup,
                VAR_PASSWORD_BANNER_MS,
                DEFAULT_PASSWORD_BANNER_MS,
            ),
            otp_resend_secs: parse_or(&lookup, VAR_OTP_RESEND_SECS, DEFAULT_OTP_RESEND_SECS),
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }

    pub fn oauth_authorize_url(&self, provider: &str) -> String {
        format!("{}/oauth2/authorization/{}", self.oauth_base, provider)
    }

    pub fn reverse_geocode_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.geocode_base, latitude, longitude
        )
    }

    pub fn banner_duration(&self) -> Duration {
        Duration::from_millis(self.banner_ms)
    }

    pub fn password_banner_duration(&self) -> Duration {
        Duration::from_millis(self.password_banner_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.oauth_base, "http://localhost:8080");
        assert_eq!(config.banner_ms, 2500);
        assert_eq!(config.password_banner_ms, 3000);
        assert_eq!(config.otp_resend_secs, 60);
    }

    #[test]
    fn test_lookup_overrides_and_trims() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (VAR_API_BASE, "https://api.maison-noir.example/"),
            (VAR_BANNER_MS, "1200"),
            (VAR_OTP_RESEND_SECS, "not-a-number"),
        ]);
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base, "https://api.maison-noir.example");
        // oauth 默认跟随 api_base
        assert_eq!(config.oauth_base, "https://api.maison-noir.example");
        assert_eq!(config.banner_ms, 1200);
        assert_eq!(config.otp_resend_secs, DEFAULT_OTP_RESEND_SECS);
    }

    #[test]
    fn test_derived_urls() {
        let config = AppConfig::default();
        assert_eq!(
            config.api_url("/api/orders/my"),
            "http://localhost:8080/api/orders/my"
        );
        assert_eq!(config.api_url("api/perfumes"), "http://localhost:8080/api/perfumes");
        assert_eq!(
            config.oauth_authorize_url("google"),
            "http://localhost:8080/oauth2/authorization/google"
        );
        assert_eq!(
            config.reverse_geocode_url(48.85, 2.35),
            "https://nominatim.openstreetmap.org/reverse?lat=48.85&lon=2.35&format=json"
        );
    }
}
