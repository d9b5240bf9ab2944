//! 认证模块
//!
//! 管理用户会话，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态；
//! 登录或登出后的跳转由路由服务监听信号变化自动完成。

use leptos::prelude::*;
use maison_shared::{Session, User};

use crate::api::{Api, load_config};
use crate::web::router::use_router;
use crate::web::{BrowserHttpClient, LocalStorage};

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（只读）
    pub session: ReadSignal<Option<Session>>,
    set_session: WriteSignal<Option<Session>>,
    /// 因 401 被动登出
    pub session_expired: RwSignal<bool>,
    api: StoredValue<Api>,
}

impl AuthContext {
    /// 创建认证上下文，并从 LocalStorage 乐观恢复会话
    pub fn new() -> Self {
        let (session, set_session) = signal(Session::restore(&LocalStorage));
        let session_expired = RwSignal::new(false);

        // 任一认证请求收到 401：token 已被清除，这里清空内存中的用户
        let api = Api::new(BrowserHttpClient, LocalStorage, load_config())
            .with_unauthorized_hook(move || {
                set_session.set(None);
                session_expired.set(true);
            });

        if let Some(s) = session.get_untracked() {
            log::info!("restored session for {}", s.user.email);
        }

        Self {
            session,
            set_session,
            session_expired,
            api: StoredValue::new(api),
        }
    }

    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Option::is_some))
    }

    pub fn is_admin_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.as_ref().is_some_and(Session::is_admin)))
    }

    /// 登录 / 注册 / OAuth 回调成功后写入会话
    pub fn sign_in(&self, session: Session) {
        self.session_expired.set(false);
        self.set_session.set(Some(session));
    }

    /// 注销并清除状态
    pub fn logout(&self) {
        self.api.with_value(|api| api.logout());
        self.set_session.set(None);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 会话过期后离开当前页面
///
/// 受保护页面由路由守卫处理；这里覆盖其余页面（例如购物车）。
#[component]
pub fn SessionExpiryWatcher() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    Effect::new(move |_| {
        if auth.session_expired.get() {
            log::warn!("session expired, redirecting to login");
            router.replace(maison_shared::route::AppRoute::auth_failure_redirect());
        }
    });
}
