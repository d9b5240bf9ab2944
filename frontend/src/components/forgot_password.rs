use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::route::AppRoute;

use crate::auth::use_auth;
use crate::components::feedback::InlineError;
use crate::components::fields::TextField;
use crate::web::router::{Link, use_router};

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let email = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let address = email.get_untracked().trim().to_string();
        let api = auth.api();
        spawn_local(async move {
            match api.forgot_password(&address).await {
                Ok(()) => router.go(AppRoute::ResetPassword { email: address }),
                Err(e) => {
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
                    <h1 class="font-serif text-4xl mb-2">"Forgot Password"</h1>
                    <p class="text-base-content/70">"We'll email you a 6-digit code to reset it."</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <InlineError message=error_msg />
                        <TextField label="Email" id="email" kind="email" autocomplete="email" required=true
                            value=email
                            on_input=move |v: String| email.set(v) />
                        <div class="form-control mt-6">
                            <button class="btn btn-primary tracking-widest uppercase" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                                } else {
                                    "Send Code".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-4">
                            <Link to="/login" class="link link-hover">"Back to sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
