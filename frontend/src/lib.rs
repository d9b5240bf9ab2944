//! Maison Noir 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `maison_shared::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth` / `cart` / `theme`: 全局状态上下文
//! - `components`: UI 组件层

mod api;
mod auth;
mod cart;
mod mount;
mod theme;
mod components {
    pub mod account;
    pub mod admin;
    pub mod auth_success;
    pub mod cart;
    mod cart_fly;
    pub mod checkout;
    mod feedback;
    mod fields;
    pub mod forgot_password;
    pub mod home;
    mod icons;
    pub mod login;
    pub mod navbar;
    pub mod not_found;
    pub mod order_detail;
    pub mod orders;
    mod product_card;
    pub mod product_detail;
    pub mod products;
    pub mod register;
    pub mod reset_password;

    pub use cart_fly::CartFlyOverlay;
}

use crate::auth::{AuthContext, SessionExpiryWatcher};
use crate::cart::CartContext;
use crate::components::CartFlyOverlay;
use crate::components::account::AccountPage;
use crate::components::admin::AdminPage;
use crate::components::auth_success::AuthSuccessPage;
use crate::components::cart::CartPage;
use crate::components::checkout::CheckoutPage;
use crate::components::forgot_password::ForgotPasswordPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::navbar::{Footer, Navbar};
use crate::components::not_found::NotFoundPage;
use crate::components::order_detail::OrderDetailPage;
use crate::components::orders::OrdersPage;
use crate::components::product_detail::ProductDetailPage;
use crate::components::products::ProductsPage;
use crate::components::register::RegisterPage;
use crate::components::reset_password::ResetPasswordPage;
use crate::theme::ThemeContext;

use leptos::prelude::*;
use maison_shared::route::AppRoute;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod console;
    pub mod download;
    pub mod geolocation;
    mod http;
    pub mod media;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::BrowserHttpClient;
    pub use storage::{LocalStorage, SessionStorage};
    pub use timer::SecondTicker;
}

use web::router::{Router, RouterOutlet};

/// 安装控制台日志
pub fn init_logging() {
    web::console::ConsoleLogger::init();
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Products => view! { <ProductsPage /> }.into_any(),
        AppRoute::ProductDetail(id) => view! { <ProductDetailPage id=id /> }.into_any(),
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::Checkout => view! { <CheckoutPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ResetPassword { email } => view! { <ResetPasswordPage email=email /> }.into_any(),
        AppRoute::AuthSuccess { token } => view! { <AuthSuccessPage token=token /> }.into_any(),
        AppRoute::Account => view! { <AccountPage /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::OrderDetail(id) => view! { <OrderDetailPage id=id /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建全局上下文（会话、购物车、主题）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(CartContext::new());
    provide_context(ThemeContext::new());

    // 2. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let is_admin = auth_ctx.is_admin_signal();

    view! {
        // 3. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated is_admin=is_admin>
            <SessionExpiryWatcher />
            <div class="min-h-screen flex flex-col bg-base-100 text-base-content">
                <Navbar />
                <main class="flex-1">
                    <RouterOutlet matcher=route_matcher />
                </main>
                <Footer />
            </div>
            <CartFlyOverlay />
        </Router>
    }
}
