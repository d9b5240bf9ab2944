//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 验证本身由 `maison_shared::route::guard` 决定。

use leptos::prelude::*;
use maison_shared::route::{AppRoute, GuardDecision, guard};
use maison_shared::storage::{remember_redirect, take_redirect};
use wasm_bindgen::prelude::*;

use super::SessionStorage;

/// 获取当前浏览器地址（path + query）
fn current_url() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}

/// 写入 History 状态（内部工具函数）
fn write_history(path: &str, use_push: bool) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = if use_push {
            history.push_state_with_url(&JsValue::NULL, "", Some(path))
        } else {
            history.replace_state_with_url(&JsValue::NULL, "", Some(path))
        };
    }
    window.scroll_to_with_x_and_y(0.0, 0.0);
}

fn set_document_title(route: &AppRoute) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        let title = match route {
            AppRoute::Home => route.title().to_string(),
            _ => format!("{} | Maison Noir", route.title()),
        };
        document.set_title(&title);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证与管理员状态以信号形式注入，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
    is_admin: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, is_admin: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_url(&current_url());
        set_document_title(&initial_route);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            is_admin,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_url(path), true);
    }

    pub fn go(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 替换当前历史记录（不产生新的后退项）
    pub fn replace(&self, route: AppRoute) {
        self.navigate_to_route(route, false);
    }

    /// 登录完成后回到被拦截的页面；没有记录时回首页
    pub fn return_after_login(&self) {
        let target = take_redirect(&SessionStorage)
            .map(|path| AppRoute::from_url(&path))
            .unwrap_or_else(AppRoute::auth_success_redirect);
        log::info!("[Router] Signed in, returning to {}", target);
        self.navigate_to_route(target, false);
    }

    /// 导航到指定路由
    ///
    /// `use_push` 为 true 使用 pushState, 否则使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let target_route = self.resolve(target_route);
        write_history(&target_route.to_path(), use_push);
        set_document_title(&target_route);
        self.set_route.set(target_route);
    }

    /// 执行守卫，返回最终应当展示的路由
    fn resolve(&self, target_route: AppRoute) -> AppRoute {
        resolve_route(
            target_route,
            self.is_authenticated.get_untracked(),
            self.is_admin.get_untracked(),
        )
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_admin = self.is_admin;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = AppRoute::from_url(&current_url());
            // popstate 时也执行守卫逻辑
            let route = resolve_route(
                requested.clone(),
                is_authenticated.get_untracked(),
                is_admin.get_untracked(),
            );
            if route != requested {
                write_history(&route.to_path(), false);
            }
            set_document_title(&route);
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化（含首次加载）时重新校验当前页面
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let is_admin = router.is_admin.get();
            let route = router.current_route.get_untracked();

            match guard(&route, is_auth, is_admin) {
                GuardDecision::Allow => {}
                // 用户刚登录，离开登录/注册页
                GuardDecision::RedirectHome if route.should_redirect_when_authenticated() => {
                    router.return_after_login();
                }
                _ => {
                    log::info!("[Router] Auth state changed, leaving {}", route);
                    router.navigate_to_route(route, false);
                }
            }
        });
    }
}

fn resolve_route(target_route: AppRoute, is_auth: bool, is_admin: bool) -> AppRoute {
    match guard(&target_route, is_auth, is_admin) {
        GuardDecision::Allow => target_route,
        GuardDecision::RedirectToLogin { remember } => {
            log::info!("[Router] Access denied to {}. Redirecting to login.", remember);
            if !remember_redirect(&SessionStorage, &remember) {
                log::warn!("[Router] Could not remember {}", remember);
            }
            AppRoute::auth_failure_redirect()
        }
        GuardDecision::RedirectHome => {
            log::info!("[Router] {} not available. Redirecting home.", target_route);
            AppRoute::Home
        }
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, is_admin: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, is_admin);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
///
/// `Router` 包裹整个应用，组件内总能取到。
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    is_authenticated: Signal<bool>,
    is_admin: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, is_admin);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，走路由服务
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留新标签页打开等浏览器默认行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
