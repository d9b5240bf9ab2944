//! Maison Noir 共享领域层
//!
//! 前端与测试共用的纯逻辑，不依赖 DOM：
//! - `cart` / `pricing` / `checkout`: 购物车与结算定价
//! - `session` / `auth`: Bearer token 解码与认证流程
//! - `protocol` / `client`: 强类型 REST 端点与 `ApiClient`
//! - `route`: 路由表与守卫决策
//! - `account` / `catalog` / `order` / `theme`: 其余页面的状态模型

pub mod account;
pub mod auth;
pub mod cancel;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod order;
pub mod pricing;
pub mod protocol;
pub mod route;
pub mod session;
pub mod storage;
pub mod theme;

pub use chrono;
pub use rust_decimal::Decimal;

pub use cart::{Cart, CartLineItem, NewCartItem};
pub use client::{ApiClient, HttpClient, HttpRequest, HttpResponse, TransportError};
pub use config::AppConfig;
pub use error::{ApiError, ApiErrorKind, ApiResult, ValidationError};
pub use session::{AuthProvider, Role, Session, User};
pub use storage::KeyValueStore;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage: 原始 Bearer token
pub const STORAGE_TOKEN_KEY: &str = "maison_noir_token";
/// LocalStorage: 购物车 JSON
pub const STORAGE_CART_KEY: &str = "maison_noir_cart";
/// LocalStorage: 主题覆盖值 ("light" / "dark")
pub const STORAGE_THEME_KEY: &str = "theme";
/// SessionStorage: 登录后一次性回跳地址
pub const STORAGE_REDIRECT_KEY: &str = "maison_noir_redirect_after_login";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
