use leptos::prelude::*;
use maison_shared::account::Profile;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock, SuccessBanner, flash};
use crate::components::fields::TextField;
use crate::components::icons::Pencil;
use crate::mount::{spawn_guarded, use_cancel_token};

#[component]
pub fn ProfilePanel() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();
    let banner_after = auth.api().config().banner_duration();

    // `saved` 是服务端的最新值，`draft` 是编辑中的副本
    let saved = RwSignal::new(Option::<Profile>::None);
    let draft = RwSignal::new(Profile::default());
    let editing = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let success_msg = RwSignal::new(Option::<String>::None);

    let api = auth.api();
    spawn_guarded(&token, async move { api.fetch_profile().await }, move |result| {
        match result {
            Ok(profile) => {
                draft.set(profile.clone());
                saved.set(Some(profile));
            }
            Err(e) => {
                log::warn!("profile load: {}", e);
                error_msg.set(Some(e.user_message()));
            }
        }
    });

    let on_edit = move |_| {
        error_msg.set(None);
        editing.set(true);
    };

    let on_cancel = move |_| {
        if let Some(profile) = saved.get_untracked() {
            draft.set(profile);
        }
        error_msg.set(None);
        editing.set(false);
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        saving.set(true);
        error_msg.set(None);

        let profile = draft.get_untracked();
        let api = auth.api();
        let task = async move { api.update_profile(&profile).await.map(|_| profile) };
        spawn_guarded(&token, task, move |result| {
            match result {
                Ok(profile) => {
                    saved.set(Some(profile));
                    editing.set(false);
                    flash(success_msg, "Profile updated", banner_after);
                }
                Err(e) => error_msg.set(Some(e.user_message())),
            }
            saving.set(false);
        });
    };

    view! {
        <section class="card bg-base-100 shadow">
            <form class="card-body" on:submit=on_save>
                <div class="flex items-center justify-between">
                    <h2 class="card-title font-serif">"Profile"</h2>
                    <Show when=move || saved.with(Option::is_some) && !editing.get()>
                        <button type="button" class="btn btn-ghost btn-sm" on:click=on_edit>
                            <Pencil attr:class="h-4 w-4" /> "Edit"
                        </button>
                    </Show>
                </div>

                <SuccessBanner message=success_msg />
                <InlineError message=error_msg />

                <Show when=move || saved.with(Option::is_some) fallback=move || view! {
                    <Show when=move || error_msg.with(Option::is_none)>
                        <LoadingBlock />
                    </Show>
                }>
                    <div class="grid gap-4 md:grid-cols-2">
                        <TextField label="Full Name" id="profile-name" autocomplete="name"
                            value=Signal::derive(move || draft.with(|p| p.name.clone()))
                            on_input=move |v: String| draft.update(|p| p.name = v)
                            disabled=Signal::derive(move || !editing.get()) />
                        // 邮箱是登录标识，不可修改
                        <TextField label="Email" id="profile-email" kind="email"
                            value=Signal::derive(move || draft.with(|p| p.email.clone()))
                            on_input=|_: String| {}
                            disabled=true />
                        <TextField label="Phone" id="profile-phone" kind="tel" autocomplete="tel"
                            value=Signal::derive(move || draft.with(|p| p.phone.clone()))
                            on_input=move |v: String| draft.update(|p| p.phone = v)
                            disabled=Signal::derive(move || !editing.get()) />
                    </div>

                    <Show when=move || editing.get()>
                        <div class="card-actions justify-end mt-4">
                            <button type="button" class="btn btn-ghost" on:click=on_cancel>"Cancel"</button>
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                            </button>
                        </div>
                    </Show>
                </Show>
            </form>
        </section>
    }
}
