use leptos::prelude::*;
use maison_shared::auth::OAUTH_FAILED;

use crate::auth::use_auth;
use crate::components::feedback::LoadingBlock;
use crate::components::icons::AlertCircle;
use crate::web::router::{Link, use_router};

/// OAuth 回调：`/auth-success?token=...`
///
/// token 只在这里消费一次，地址栏由路由替换为目标页面。
#[component]
pub fn AuthSuccessPage(token: String) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let (failed, set_failed) = signal(false);

    // 挂载后再切换路由，避免在渲染过程中修改路由信号
    let token = StoredValue::new(token);
    Effect::new(move |_| {
        let result = token.with_value(|t| auth.api().accept_oauth_token(t));
        match result {
            Ok(session) => {
                log::info!("oauth sign-in for {}", session.user.email);
                auth.sign_in(session);
                router.return_after_login();
            }
            Err(e) => {
                log::warn!("oauth callback rejected: {}", e);
                set_failed.set(true);
            }
        }
    });

    view! {
        <Show when=move || failed.get() fallback=|| view! { <LoadingBlock label="Signing you in" /> }>
            <div class="hero min-h-[60vh]">
                <div class="hero-content flex-col text-center">
                    <AlertCircle attr:class="h-12 w-12 text-error" />
                    <p class="text-lg">{OAUTH_FAILED}</p>
                    <Link to="/login" class="btn btn-primary tracking-widest uppercase">"Back to sign in"</Link>
                </div>
            </div>
        </Show>
    }
}
