use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::auth::RegisterForm;

use crate::auth::use_auth;
use crate::components::feedback::InlineError;
use crate::components::fields::TextField;
use crate::components::login::OAuthButtons;
use crate::web::router::Link;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();

    let form = RwSignal::new(RegisterForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let values = form.get_untracked();
        if let Err(e) = values.validate() {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = auth.api();
        spawn_local(async move {
            match api.register(&values).await {
                Ok(session) => auth.sign_in(session),
                Err(e) => {
                    log::info!("registration failed: {}", e);
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
                    <p class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-2">"Join the Maison"</p>
                    <h1 class="font-serif text-4xl">"Create Account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <InlineError message=error_msg />

                        <TextField label="Full Name" id="name" kind="text" autocomplete="name"
                            value=Signal::derive(move || form.with(|f| f.name.clone()))
                            on_input=move |v: String| form.update(|f| f.name = v) />
                        <TextField label="Email" id="email" kind="email" autocomplete="email"
                            value=Signal::derive(move || form.with(|f| f.email.clone()))
                            on_input=move |v: String| form.update(|f| f.email = v) />
                        <TextField label="Password" id="password" kind="password" autocomplete="new-password"
                            value=Signal::derive(move || form.with(|f| f.password.clone()))
                            on_input=move |v: String| form.update(|f| f.password = v) />
                        <TextField label="Confirm Password" id="confirm" kind="password" autocomplete="new-password"
                            value=Signal::derive(move || form.with(|f| f.confirm.clone()))
                            on_input=move |v: String| form.update(|f| f.confirm = v) />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary tracking-widest uppercase" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Create Account".into_any()
                                }}
                            </button>
                        </div>

                        <OAuthButtons />

                        <p class="text-center text-sm mt-4">
                            "Already have an account? "
                            <Link to="/login" class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
