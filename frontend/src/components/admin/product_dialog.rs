//! 新建 / 编辑商品的模态框
//!
//! 打开与关闭完全由 `FormMode` 驱动：Effect 根据模式调用
//! `show_modal()` / `close()`，用户按 Esc 关闭时回调 `on_close`。

use leptos::prelude::*;
use maison_shared::catalog::{FormMode, ProductDraft};

use super::form_state::FormState;
use crate::components::feedback::InlineError;
use crate::components::fields::TextField;

#[component]
pub fn ProductDialog(
    state: FormState,
    #[prop(into)] mode: Signal<FormMode>,
    #[prop(into)] saving: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] on_submit: Callback<ProductDraft>,
    #[prop(into)] on_close: Callback<()>,
    /// 本地校验失败时的提示
    #[prop(into)] on_invalid: Callback<String>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        let Some(dialog) = dialog_ref.get() else {
            return;
        };
        if mode.get().is_open() {
            if !dialog.open() {
                let _ = dialog.show_modal();
            }
        } else if dialog.open() {
            dialog.close();
        }
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match state.to_draft() {
            Ok(draft) => on_submit.run(draft),
            Err(e) => on_invalid.run(e.to_string()),
        }
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| {
            if mode.get_untracked().is_open() {
                on_close.run(());
            }
        }>
            <div class="modal-box max-w-2xl">
                <h3 class="font-serif text-2xl mb-4">{move || mode.get().title()}</h3>

                <form on:submit=submit class="space-y-2">
                    <InlineError message=error />

                    <div class="grid gap-4 md:grid-cols-2">
                        <TextField label="Name" id="product-name" required=true
                            value=state.name
                            on_input=move |v: String| state.name.set(v) />
                        <div class="form-control">
                            <label for="product-price" class="label">
                                <span class="label-text">"Price"</span>
                            </label>
                            <input id="product-price" required
                                type="number"
                                min="0.01"
                                step="0.01"
                                class="input input-bordered"
                                prop:value=state.price
                                on:input=move |ev| state.price.set(event_target_value(&ev))
                            />
                        </div>
                        <TextField label="Category" id="product-category"
                            value=state.category_name
                            on_input=move |v: String| state.category_name.set(v) />
                        <TextField label="Size" id="product-size"
                            value=state.size
                            on_input=move |v: String| state.size.set(v) />
                    </div>

                    <TextField label="Image URL" id="product-image" kind="url"
                        value=state.image_url
                        on_input=move |v: String| state.image_url.set(v) />
                    <TextField label="Notes" id="product-notes"
                        value=state.notes
                        on_input=move |v: String| state.notes.set(v) />

                    <div class="form-control">
                        <label for="product-description" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea id="product-description" rows="3"
                            class="textarea textarea-bordered"
                            prop:value=state.description
                            on:input=move |ev| state.description.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label class="label cursor-pointer justify-start gap-3">
                            <input type="checkbox" class="toggle toggle-primary"
                                prop:checked=state.featured
                                on:change=move |ev| state.featured.set(event_target_checked(&ev))
                            />
                            <span class="label-text">"Featured on home page"</span>
                        </label>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_close.run(())>"Cancel"</button>
                        <button type="submit" disabled=move || saving.get() class="btn btn-primary">
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save Product".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
