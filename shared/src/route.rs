//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM。
//! 定义应用的全部路由、它们的访问要求以及守卫决策。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Products,
    ProductDetail(i64),
    Cart,
    Checkout,
    Login,
    Register,
    ForgotPassword,
    ResetPassword { email: String },
    AuthSuccess { token: String },
    Account,
    Orders,
    OrderDetail(i64),
    Admin,
    NotFound,
}

impl AppRoute {
    /// 解析 `path?query`，忽略 `#fragment`
    pub fn from_url(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        Self::from_parts(path, query)
    }

    pub fn from_parts(path: &str, query: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["products"] => Self::Products,
            ["products", id] => id.parse().map_or(Self::NotFound, Self::ProductDetail),
            ["cart"] => Self::Cart,
            ["checkout"] => Self::Checkout,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["forgot-password"] => Self::ForgotPassword,
            ["reset-password"] => Self::ResetPassword {
                email: query_param(query, "email").unwrap_or_default(),
            },
            ["auth-success"] => Self::AuthSuccess {
                token: query_param(query, "token").unwrap_or_default(),
            },
            ["account"] => Self::Account,
            ["orders"] => Self::Orders,
            ["orders", id] => id.parse().map_or(Self::NotFound, Self::OrderDetail),
            ["admin"] => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL（含查询参数）
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductDetail(id) => format!("/products/{}", id),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword { email } if email.is_empty() => "/reset-password".to_string(),
            Self::ResetPassword { email } => {
                format!("/reset-password?email={}", urlencoding::encode(email))
            }
            // token 只应出现在 OAuth 回调地址中，不回写到 history
            Self::AuthSuccess { .. } => "/auth-success".to_string(),
            Self::Account => "/account".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::OrderDetail(id) => format!("/orders/{}", id),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 定义该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Checkout | Self::Account | Self::Orders | Self::OrderDetail(_) | Self::Admin
        )
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// 已认证用户是否应该离开此路由
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Maison Noir",
            Self::Products => "Collection",
            Self::ProductDetail(_) => "Fragrance",
            Self::Cart => "Your Bag",
            Self::Checkout => "Checkout",
            Self::Login => "Sign In",
            Self::Register => "Create Account",
            Self::ForgotPassword => "Forgot Password",
            Self::ResetPassword { .. } => "Reset Password",
            Self::AuthSuccess { .. } => "Signing In",
            Self::Account => "My Account",
            Self::Orders => "My Orders",
            Self::OrderDetail(_) => "Order Details",
            Self::Admin => "Admin",
            Self::NotFound => "Not Found",
        }
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功且没有回跳地址时的默认目标
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| {
            let v = v.replace('+', " ");
            urlencoding::decode(&v)
                .map(|s| s.into_owned())
                .unwrap_or(v)
        })
}

// =========================================================
// 守卫
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// 未登录访问受保护页面；`remember` 为登录后应回跳的地址
    RedirectToLogin { remember: String },
    /// 已登录访问登录/注册页，或非管理员访问后台
    RedirectHome,
}

pub fn guard(route: &AppRoute, is_authenticated: bool, is_admin: bool) -> GuardDecision {
    if route.requires_auth() && !is_authenticated {
        return GuardDecision::RedirectToLogin {
            remember: route.to_path(),
        };
    }
    if route.requires_admin() && !is_admin {
        return GuardDecision::RedirectHome;
    }
    if route.should_redirect_when_authenticated() && is_authenticated {
        return GuardDecision::RedirectHome;
    }
    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(AppRoute::from_url("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_url(""), AppRoute::Home);
        assert_eq!(AppRoute::from_url("/products/"), AppRoute::Products);
        assert_eq!(AppRoute::from_url("/products/12"), AppRoute::ProductDetail(12));
        assert_eq!(AppRoute::from_url("/products/abc"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_url("/orders/7#items"), AppRoute::OrderDetail(7));
        assert_eq!(AppRoute::from_url("/about"), AppRoute::NotFound);
    }

    #[test]
    fn test_query_params() {
        assert_eq!(
            AppRoute::from_url("/reset-password?email=claire%40maison-noir.com"),
            AppRoute::ResetPassword {
                email: "claire@maison-noir.com".to_string()
            }
        );
        assert_eq!(
            AppRoute::from_url("/auth-success?state=x&token=abc.def.ghi"),
            AppRoute::AuthSuccess {
                token: "abc.def.ghi".to_string()
            }
        );
        assert_eq!(
            AppRoute::from_url("/auth-success"),
            AppRoute::AuthSuccess {
                token: String::new()
            }
        );
    }

    #[test]
    fn test_paths_roundtrip() {
        let routes = [
            AppRoute::Home,
            AppRoute::ProductDetail(3),
            AppRoute::Checkout,
            AppRoute::ResetPassword {
                email: "a+b@x.com".to_string(),
            },
            AppRoute::OrderDetail(42),
            AppRoute::Admin,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_url(&route.to_path()), route);
        }
        assert!(!AppRoute::AuthSuccess { token: "secret".into() }
            .to_path()
            .contains("secret"));
    }

    #[test]
    fn test_guard_redirects_anonymous_to_login() {
        assert_eq!(
            guard(&AppRoute::Checkout, false, false),
            GuardDecision::RedirectToLogin {
                remember: "/checkout".to_string()
            }
        );
        assert_eq!(
            guard(&AppRoute::OrderDetail(5), false, false),
            GuardDecision::RedirectToLogin {
                remember: "/orders/5".to_string()
            }
        );
        assert_eq!(guard(&AppRoute::Cart, false, false), GuardDecision::Allow);
    }

    #[test]
    fn test_guard_admin_and_auth_pages() {
        assert_eq!(guard(&AppRoute::Admin, true, false), GuardDecision::RedirectHome);
        assert_eq!(guard(&AppRoute::Admin, true, true), GuardDecision::Allow);
        assert_eq!(guard(&AppRoute::Login, true, false), GuardDecision::RedirectHome);
        assert_eq!(guard(&AppRoute::Register, false, false), GuardDecision::Allow);
    }
}
