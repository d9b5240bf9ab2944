//! 收货地址：列表 + 新建/编辑表单，每次修改后重新拉取列表

use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::account::{Address, AddressDraft, AddressType};

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock, SuccessBanner, flash};
use crate::components::fields::TextField;
use crate::components::icons::{Crosshair, MapPin, Pencil, Plus, Trash};
use crate::mount::{spawn_guarded, use_cancel_token};
use crate::web::geolocation::current_position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    Create,
    Update(i64),
}

#[component]
pub fn AddressPanel() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();
    let banner_after = auth.api().config().banner_duration();

    let addresses = RwSignal::new(Option::<Vec<Address>>::None);
    let target = RwSignal::new(Option::<EditTarget>::None);
    let draft = RwSignal::new(AddressDraft::default());
    let saving = RwSignal::new(false);
    let locating = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let success_msg = RwSignal::new(Option::<String>::None);

    let reload = {
        let token = token.clone();
        Callback::new(move |_: ()| {
            let api = auth.api();
            spawn_guarded(&token, async move { api.fetch_addresses().await }, move |result| {
                match result {
                    Ok(list) => addresses.set(Some(list)),
                    Err(e) => {
                        log::warn!("address load: {}", e);
                        addresses.set(Some(Vec::new()));
                        error_msg.set(Some(e.user_message()));
                    }
                }
            });
        })
    };
    reload.run(());

    let open_create = move |_| {
        draft.set(AddressDraft::default());
        error_msg.set(None);
        target.set(Some(EditTarget::Create));
    };

    let open_edit = move |address: Address| {
        draft.set(address.fields);
        error_msg.set(None);
        target.set(Some(EditTarget::Update(address.id)));
    };

    let close_form = move |_| {
        target.set(None);
        error_msg.set(None);
    };

    let on_delete = {
        let token = token.clone();
        move |id: i64| {
            let confirmed = window()
                .confirm_with_message("Delete this address?")
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let api = auth.api();
            spawn_guarded(&token, async move { api.delete_address(id).await }, move |result| {
                match result {
                    Ok(()) => {
                        flash(success_msg, "Address removed", banner_after);
                        reload.run(());
                    }
                    Err(e) => error_msg.set(Some(e.user_message())),
                }
            });
        }
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = target.get_untracked() else {
            return;
        };
        if saving.get_untracked() {
            return;
        }
        let fields = draft.get_untracked();
        if let Err(e) = fields.validate() {
            error_msg.set(Some(e.to_string()));
            return;
        }

        saving.set(true);
        error_msg.set(None);

        let api = auth.api();
        let task = async move {
            match mode {
                EditTarget::Create => api.create_address(&fields).await,
                EditTarget::Update(id) => api.update_address(&Address { id, fields }).await,
            }
        };
        spawn_guarded(&token, task, move |result| {
            match result {
                Ok(()) => {
                    target.set(None);
                    let text = match mode {
                        EditTarget::Create => "Address added",
                        EditTarget::Update(_) => "Address updated",
                    };
                    flash(success_msg, text, banner_after);
                    reload.run(());
                }
                Err(e) => error_msg.set(Some(e.user_message())),
            }
            saving.set(false);
        });
    };

    // 定位失败时保留表单原样
    let use_location = move |_| {
        if locating.get_untracked() {
            return;
        }
        locating.set(true);
        let api = auth.api();
        spawn_local(async move {
            match current_position().await {
                Ok(coords) => match api.reverse_geocode(coords.latitude, coords.longitude).await {
                    Ok(place) => {
                        draft.try_update(|d| place.apply_to(d));
                    }
                    Err(e) => {
                        log::warn!("reverse geocode: {}", e);
                        error_msg.try_set(Some("Could not look up your address".to_string()));
                    }
                },
                Err(reason) => {
                    log::info!("geolocation unavailable: {}", reason);
                    error_msg.try_set(Some(reason));
                }
            }
            locating.try_set(false);
        });
    };

    let form_title = move || match target.get() {
        Some(EditTarget::Update(_)) => "Edit Address",
        _ => "New Address",
    };

    view! {
        <section class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h2 class="card-title font-serif">"Addresses"</h2>
                    <Show when=move || target.with(Option::is_none)>
                        <button type="button" class="btn btn-ghost btn-sm" on:click=open_create>
                            <Plus attr:class="h-4 w-4" /> "Add Address"
                        </button>
                    </Show>
                </div>

                <SuccessBanner message=success_msg />
                <InlineError message=error_msg />

                <Show when=move || target.with(Option::is_some)>
                    <form class="border border-base-300 rounded-box p-4 space-y-2" on:submit=on_save.clone()>
                        <div class="flex items-center justify-between">
                            <h3 class="font-medium">{form_title}</h3>
                            <button type="button" class="btn btn-outline btn-xs" on:click=use_location disabled=move || locating.get()>
                                <Crosshair attr:class="h-3 w-3" />
                                {move || if locating.get() { "Locating..." } else { "Use current location" }}
                            </button>
                        </div>

                        <div class="form-control">
                            <label class="label" for="address-type">
                                <span class="label-text">"Address Type"</span>
                            </label>
                            <select
                                id="address-type"
                                class="select select-bordered"
                                prop:value=move || draft.with(|d| d.kind.as_str())
                                on:change=move |ev| draft.update(|d| d.kind = AddressType::parse(&event_target_value(&ev)))
                            >
                                {AddressType::ALL.iter().map(|kind| view! {
                                    <option value=kind.as_str()>{kind.label()}</option>
                                }).collect_view()}
                            </select>
                        </div>

                        <div class="grid gap-4 md:grid-cols-2">
                            <TextField label="Full Name" id="address-name" autocomplete="name" required=true
                                value=Signal::derive(move || draft.with(|d| d.name.clone()))
                                on_input=move |v: String| draft.update(|d| d.name = v) />
                            <TextField label="Phone" id="address-phone" kind="tel" autocomplete="tel" required=true
                                value=Signal::derive(move || draft.with(|d| d.phone.clone()))
                                on_input=move |v: String| draft.update(|d| d.phone = v) />
                            <TextField label="Alternate Phone" id="address-alt-phone" kind="tel"
                                value=Signal::derive(move || draft.with(|d| d.alt_phone.clone()))
                                on_input=move |v: String| draft.update(|d| d.alt_phone = v) />
                            <TextField label="Landmark" id="address-landmark"
                                value=Signal::derive(move || draft.with(|d| d.landmark.clone()))
                                on_input=move |v: String| draft.update(|d| d.landmark = v) />
                            <TextField label="City" id="address-city" autocomplete="address-level2" required=true
                                value=Signal::derive(move || draft.with(|d| d.city.clone()))
                                on_input=move |v: String| draft.update(|d| d.city = v) />
                            <TextField label="Postal Code" id="address-postal" autocomplete="postal-code" required=true
                                value=Signal::derive(move || draft.with(|d| d.postal_code.clone()))
                                on_input=move |v: String| draft.update(|d| d.postal_code = v) />
                        </div>
                        <TextField label="Address" id="address-line" autocomplete="street-address" required=true
                            value=Signal::derive(move || draft.with(|d| d.line.clone()))
                            on_input=move |v: String| draft.update(|d| d.line = v) />

                        <div class="card-actions justify-end pt-2">
                            <button type="button" class="btn btn-ghost" on:click=close_form>"Cancel"</button>
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() { "Saving..." } else { "Save Address" }}
                            </button>
                        </div>
                    </form>
                </Show>

                {move || match addresses.get() {
                    None => view! { <LoadingBlock /> }.into_any(),
                    Some(list) if list.is_empty() => view! {
                        <p class="text-base-content/60 py-6 text-center">"No saved addresses yet."</p>
                    }.into_any(),
                    Some(list) => {
                        let on_delete = on_delete.clone();
                        view! {
                            <ul class="divide-y divide-base-300">
                                {list.into_iter().map(|address| {
                                    let id = address.id;
                                    let on_delete = on_delete.clone();
                                    let for_edit = address.clone();
                                    view! {
                                        <li class="flex items-start justify-between gap-4 py-4">
                                            <div class="flex gap-3">
                                                <MapPin attr:class="h-5 w-5 mt-0.5 shrink-0 text-base-content/60" />
                                                <div>
                                                    <p class="font-medium">
                                                        {address.fields.name.clone()}
                                                        <span class="badge badge-ghost badge-sm ml-2">{address.fields.kind.label()}</span>
                                                    </p>
                                                    <p class="text-sm text-base-content/70">{address.fields.one_line()}</p>
                                                    <p class="text-sm text-base-content/60">{address.fields.phone.clone()}</p>
                                                </div>
                                            </div>
                                            <div class="flex gap-1">
                                                <button type="button" class="btn btn-ghost btn-sm btn-square" aria-label="Edit address"
                                                    on:click=move |_| open_edit(for_edit.clone())>
                                                    <Pencil attr:class="h-4 w-4" />
                                                </button>
                                                <button type="button" class="btn btn-ghost btn-sm btn-square text-error" aria-label="Delete address"
                                                    on:click=move |_| on_delete(id)>
                                                    <Trash attr:class="h-4 w-4" />
                                                </button>
                                            </div>
                                        </li>
                                    }
                                }).collect_view()}
                            </ul>
                        }.into_any()
                    }
                }}
            </div>
        </section>
    }
}
