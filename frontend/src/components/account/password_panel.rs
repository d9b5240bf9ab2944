use leptos::prelude::*;
use maison_shared::account::PasswordChangeForm;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, SuccessBanner, flash};
use crate::components::fields::TextField;
use crate::components::icons::ShieldCheck;
use crate::mount::{spawn_guarded, use_cancel_token};

/// 修改密码；第三方登录的账户只显示说明
#[component]
pub fn PasswordPanel() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();
    let banner_after = auth.api().config().password_banner_duration();

    let form = RwSignal::new(PasswordChangeForm::default());
    let saving = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let success_msg = RwSignal::new(Option::<String>::None);

    let has_local_password = move || auth.user().is_some_and(|u| u.has_local_password());
    let provider_label = move || {
        auth.user()
            .map(|u| u.provider.label().to_string())
            .unwrap_or_default()
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let Some(user) = auth.user() else {
            return;
        };
        let values = form.get_untracked();
        if let Err(e) = values.validate() {
            error_msg.set(Some(e.to_string()));
            return;
        }

        saving.set(true);
        error_msg.set(None);

        let api = auth.api();
        let task = async move { api.change_password(&user, &values).await };
        spawn_guarded(&token, task, move |result| {
            match result {
                Ok(text) => {
                    form.update(PasswordChangeForm::clear);
                    let text = if text.trim().is_empty() {
                        "Password updated".to_string()
                    } else {
                        text
                    };
                    flash(success_msg, text, banner_after);
                }
                Err(e) => error_msg.set(Some(e.user_message())),
            }
            saving.set(false);
        });
    };

    view! {
        <section class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title font-serif">"Password"</h2>

                <Show when=has_local_password fallback=move || view! {
                    <div class="flex items-start gap-3 text-base-content/70">
                        <ShieldCheck attr:class="h-5 w-5 mt-0.5 shrink-0" />
                        <p>{move || format!(
                            "You signed in with {}. Manage your password with that provider.",
                            provider_label()
                        )}</p>
                    </div>
                }>
                    <form class="space-y-2" on:submit=on_submit.clone()>
                        <SuccessBanner message=success_msg />
                        <InlineError message=error_msg />

                        <TextField label="Current Password" id="current-password" kind="password" autocomplete="current-password"
                            value=Signal::derive(move || form.with(|f| f.current.clone()))
                            on_input=move |v: String| form.update(|f| f.current = v) />
                        <div class="grid gap-4 md:grid-cols-2">
                            <TextField label="New Password" id="new-password" kind="password" autocomplete="new-password"
                                value=Signal::derive(move || form.with(|f| f.new_password.clone()))
                                on_input=move |v: String| form.update(|f| f.new_password = v) />
                            <TextField label="Confirm New Password" id="confirm-password" kind="password" autocomplete="new-password"
                                value=Signal::derive(move || form.with(|f| f.confirm.clone()))
                                on_input=move |v: String| form.update(|f| f.confirm = v) />
                        </div>

                        <div class="card-actions justify-end pt-2">
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() { "Updating..." } else { "Update Password" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </section>
    }
}
