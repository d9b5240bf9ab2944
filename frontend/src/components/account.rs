//! 账户页：资料、密码、收货地址三个面板各自加载、各自提交

mod address_panel;
mod password_panel;
mod profile_panel;

use leptos::prelude::*;

use crate::auth::use_auth;
use address_panel::AddressPanel;
use password_panel::PasswordPanel;
use profile_panel::ProfilePanel;

#[component]
pub fn AccountPage() -> impl IntoView {
    let auth = use_auth();
    let initials = move || auth.user().map(|u| u.initials()).unwrap_or_default();
    let name = move || auth.user().map(|u| u.name).unwrap_or_default();

    view! {
        <div class="mx-auto max-w-4xl px-6 py-12">
            <div class="flex items-center gap-4 mb-10">
                <div class="avatar placeholder">
                    <div class="bg-neutral text-neutral-content w-16 rounded-full">
                        <span class="text-xl">{initials}</span>
                    </div>
                </div>
                <div>
                    <p class="text-xs tracking-[0.3em] uppercase text-base-content/60">"My Account"</p>
                    <h1 class="font-serif text-3xl">{name}</h1>
                </div>
            </div>

            <div class="space-y-8">
                <ProfilePanel />
                <PasswordPanel />
                <AddressPanel />
            </div>
        </div>
    }
}
