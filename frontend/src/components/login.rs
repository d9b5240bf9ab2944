use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::auth::LoginForm;
use maison_shared::error::SESSION_EXPIRED;
use maison_shared::AuthProvider;

use crate::auth::use_auth;
use crate::components::feedback::InlineError;
use crate::web::router::Link;

/// 整页跳转到后端的 OAuth 授权入口，控制权离开应用
fn start_oauth(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("oauth redirect failed: {:?}", e);
        }
    }
}

#[component]
pub fn OAuthButtons() -> impl IntoView {
    let auth = use_auth();
    let google_url = auth.api().oauth_authorize_url(AuthProvider::Google);

    view! {
        {google_url.map(|url| view! {
            <div class="divider text-xs tracking-widest uppercase text-base-content/50">"or"</div>
            <button type="button" class="btn btn-outline w-full gap-2" on:click=move |_| start_oauth(&url)>
                <span class="font-bold">"G"</span>
                "Continue with Google"
            </button>
        })}
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let expired = move || auth.session_expired.get();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        if let Err(e) = form.validate() {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = auth.api();
        spawn_local(async move {
            match api.login(&form).await {
                // 跳转由路由服务监听认证状态完成
                Ok(session) => auth.sign_in(session),
                Err(e) => {
                    log::info!("login failed: {}", e);
                    set_error_msg.try_set(Some(e.user_message()));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <p class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-2">"Welcome Back"</p>
                    <h1 class="font-serif text-4xl">"Sign In"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=expired>
                            <div role="status" class="alert alert-warning text-sm py-2">{SESSION_EXPIRED}</div>
                        </Show>
                        <InlineError message=error_msg />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                                <Link to="/forgot-password" class="label-text-alt link link-hover">"Forgot password?"</Link>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary tracking-widest uppercase" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign In".into_any()
                                }}
                            </button>
                        </div>

                        <OAuthButtons />

                        <p class="text-center text-sm mt-4">
                            "New to Maison Noir? "
                            <Link to="/register" class="link link-primary">"Create an account"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
