//! 后台商品管理
//!
//! `AdminCatalog` 同时保存列表和表单模式。每次保存或删除都在一份副本上
//! 调用接口，写入成功后用副本整体替换，不做局部修补。列表刷新失败时
//! 表单照常关闭，错误显示在列表上方。

mod form_state;
mod product_dialog;

use leptos::prelude::*;
use maison_shared::catalog::{AdminCatalog, FormMode, Product, ProductDraft};
use maison_shared::pricing::format_price;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock, SuccessBanner, flash};
use crate::components::icons::{Pencil, Plus, Sparkles, Trash};
use crate::mount::{spawn_guarded, use_cancel_token};
use form_state::FormState;
use product_dialog::ProductDialog;

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();
    let banner_after = auth.api().config().banner_duration();

    let catalog = RwSignal::new(AdminCatalog::default());
    let form = FormState::new();
    let (loading, set_loading) = signal(true);
    let saving = RwSignal::new(false);
    let list_error = RwSignal::new(Option::<String>::None);
    let form_error = RwSignal::new(Option::<String>::None);
    let success_msg = RwSignal::new(Option::<String>::None);

    let api = auth.api();
    spawn_guarded(&token, async move { api.list_products().await }, move |result| {
        match result {
            Ok(list) => catalog.update(|c| c.products = list),
            Err(e) => {
                log::warn!("admin product list: {}", e);
                list_error.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    let open_create = move |_| {
        catalog.update(AdminCatalog::open_create);
        catalog.with_untracked(|c| form.load(&c.draft));
        form_error.set(None);
    };

    let open_edit = move |id: i64| {
        let opened = catalog.try_update(|c| c.open_edit(id)).unwrap_or(false);
        if opened {
            catalog.with_untracked(|c| form.load(&c.draft));
            form_error.set(None);
        }
    };

    let close_form = Callback::new(move |_: ()| {
        catalog.update(AdminCatalog::close);
        form_error.set(None);
    });

    let on_submit = {
        let token = token.clone();
        Callback::new(move |draft: ProductDraft| {
            if saving.get_untracked() {
                return;
            }
            saving.set(true);
            form_error.set(None);

            let mut snapshot = catalog.get_untracked();
            snapshot.draft = draft;
            let created = !matches!(snapshot.form, FormMode::Edit(_));
            let api = auth.api();
            let task = async move {
                api.save_product(&mut snapshot)
                    .await
                    .map(|outcome| (snapshot, outcome))
            };
            spawn_guarded(&token, task, move |result| {
                match result {
                    Ok((saved, outcome)) => {
                        catalog.set(saved);
                        list_error.set(outcome.refresh_error.map(|e| e.user_message()));
                        let text = if created { "Product created" } else { "Product updated" };
                        flash(success_msg, text, banner_after);
                    }
                    Err(e) => form_error.set(Some(e.user_message())),
                }
                saving.set(false);
            });
        })
    };

    let on_delete = move |product: Product| {
        let prompt = format!("Delete \"{}\"? This cannot be undone.", product.name);
        if !window().confirm_with_message(&prompt).unwrap_or(false) {
            return;
        }
        list_error.set(None);

        let mut snapshot = catalog.get_untracked();
        let api = auth.api();
        let task = async move {
            api.delete_product(&mut snapshot, product.id)
                .await
                .map(|outcome| (snapshot, outcome))
        };
        spawn_guarded(&token, task, move |result| match result {
            Ok((deleted, outcome)) => {
                catalog.set(deleted);
                list_error.set(outcome.refresh_error.map(|e| e.user_message()));
                flash(success_msg, "Product deleted", banner_after);
            }
            Err(e) => list_error.set(Some(e.user_message())),
        });
    };

    let on_delete = StoredValue::new_local(on_delete);
    let featured = move || catalog.with(AdminCatalog::featured_count);
    let total = move || catalog.with(|c| c.products.len());

    view! {
        <div class="mx-auto max-w-6xl px-6 py-12">
            <div class="flex flex-wrap items-end justify-between gap-4 mb-8">
                <div>
                    <p class="text-xs tracking-[0.3em] uppercase text-base-content/60">"Administration"</p>
                    <h1 class="font-serif text-4xl">"Catalog"</h1>
                    <p class="text-sm text-base-content/60 mt-1">
                        {move || format!("{} products, {} featured", total(), featured())}
                    </p>
                </div>
                <button class="btn btn-primary gap-2" on:click=open_create>
                    <Plus attr:class="h-4 w-4" /> "Add Product"
                </button>
            </div>

            <SuccessBanner message=success_msg />
            <InlineError message=list_error />

            <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading catalog" /> }>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Product"</th>
                                <th>"Category"</th>
                                <th>"Size"</th>
                                <th class="text-right">"Price"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || catalog.with(|c| c.products.clone())
                                key=|p| {
                                    // 编辑后内容变化也要重新渲染该行
                                    (p.id, p.name.clone(), p.price, p.featured, p.image_url.clone(), p.category_name.clone(), p.size.clone())
                                }
                                let:product
                            >
                                {
                                    let id = product.id;
                                    let on_delete = on_delete.clone();
                                    let for_delete = product.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="flex items-center gap-3">
                                                    <img src=product.image_url.clone() alt=product.name.clone()
                                                        class="h-12 w-12 rounded object-cover bg-base-200" />
                                                    <div>
                                                        <p class="font-medium">{product.name.clone()}</p>
                                                        {product.featured.then(|| view! {
                                                            <span class="badge badge-primary badge-sm gap-1">
                                                                <Sparkles attr:class="h-3 w-3" /> "Featured"
                                                            </span>
                                                        })}
                                                    </div>
                                                </div>
                                            </td>
                                            <td>{product.category_name.clone()}</td>
                                            <td>{product.size.clone()}</td>
                                            <td class="text-right">{format_price(product.price)}</td>
                                            <td class="text-right whitespace-nowrap">
                                                <button class="btn btn-ghost btn-sm btn-square" aria-label="Edit product"
                                                    on:click=move |_| open_edit(id)>
                                                    <Pencil attr:class="h-4 w-4" />
                                                </button>
                                                <button class="btn btn-ghost btn-sm btn-square text-error" aria-label="Delete product"
                                                    on:click=move |_| on_delete.with_value(|f| f(for_delete.clone()))>
                                                    <Trash attr:class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            </For>
                        </tbody>
                    </table>
                </div>
            </Show>

            <ProductDialog
                state=form
                mode=Signal::derive(move || catalog.with(|c| c.form))
                saving=saving
                error=form_error
                on_submit=on_submit
                on_close=close_form
                on_invalid=move |message: String| form_error.set(Some(message))
            />
        </div>
    }
}
