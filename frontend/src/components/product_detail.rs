use std::time::Duration;

use leptos::prelude::*;
use maison_shared::catalog::Product;
use maison_shared::pricing::{FREE_SHIPPING_THRESHOLD, format_price};
use maison_shared::ApiErrorKind;

use crate::auth::use_auth;
use crate::cart::use_cart;
use crate::components::feedback::{InlineError, LoadingBlock};
use crate::components::icons::{Check, ChevronLeft, Minus, Plus, ShoppingBag};
use crate::components::not_found::NotFoundPage;
use crate::mount::{spawn_guarded, use_cancel_token};
use crate::web::router::Link;

#[component]
pub fn ProductDetailPage(id: i64) -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();

    let (product, set_product) = signal(Option::<Product>::None);
    let (loading, set_loading) = signal(true);
    let (missing, set_missing) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let api = auth.api();
    spawn_guarded(&token, async move { api.product(id).await }, move |result| {
        match result {
            Ok(p) => set_product.set(Some(p)),
            Err(e) if e.kind == ApiErrorKind::NotFound => set_missing.set(true),
            Err(e) => set_error.set(Some(e.user_message())),
        }
        set_loading.set(false);
    });

    view! {
        <div class="mx-auto max-w-6xl px-6 py-10">
            <Link to="/products" class="btn btn-ghost btn-sm gap-2 mb-8">
                <ChevronLeft attr:class="h-4 w-4" />
                <span class="tracking-widest uppercase">"Back to Collection"</span>
            </Link>

            <InlineError message=error />

            {move || {
                if loading.get() {
                    view! { <LoadingBlock /> }.into_any()
                } else if missing.get() {
                    view! { <NotFoundPage /> }.into_any()
                } else {
                    match product.get() {
                        Some(p) => view! { <ProductDetails product=p /> }.into_any(),
                        None => ().into_any(),
                    }
                }
            }}
        </div>
    }
}

#[component]
fn ProductDetails(product: Product) -> impl IntoView {
    let cart = use_cart();
    let (quantity, set_quantity) = signal(1u32);
    let (added, set_added) = signal(false);

    let notes: Vec<String> = product.note_list().into_iter().map(str::to_string).collect();
    let price = format_price(product.price);
    let shipping_hint = format!(
        "Complimentary shipping on orders over {}",
        format_price(FREE_SHIPPING_THRESHOLD)
    );
    let size = product.size.clone();
    let product = StoredValue::new(product);

    let on_add = move |ev: web_sys::MouseEvent| {
        let origin = (f64::from(ev.client_x()), f64::from(ev.client_y()));
        product.with_value(|p| cart.add_to_cart(p, quantity.get_untracked(), Some(origin)));
        set_added.set(true);
        set_timeout(move || set_added.set(false), Duration::from_millis(2000));
    };

    view! {
        <div class="grid gap-12 md:grid-cols-2">
            <figure class="aspect-[3/4] overflow-hidden rounded-box bg-base-200">
                <img
                    src=product.with_value(|p| p.image_url.clone())
                    alt=product.with_value(|p| p.name.clone())
                    class="h-full w-full object-cover"
                />
            </figure>

            <div class="flex flex-col">
                <p class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-3">
                    {product.with_value(|p| p.category_name.clone())}
                </p>
                <h1 class="font-serif text-4xl md:text-5xl font-medium mb-4 tracking-tight">
                    {product.with_value(|p| p.name.clone())}
                </h1>
                <p class="font-serif text-3xl mb-8">{price}</p>
                <p class="text-base-content/70 leading-relaxed mb-8">
                    {product.with_value(|p| p.description.clone())}
                </p>

                <Show when={
                    let empty = notes.is_empty();
                    move || !empty
                }>
                    <div class="mb-8">
                        <h2 class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-3">"Notes"</h2>
                        <div class="flex flex-wrap gap-2">
                            {notes.clone().into_iter().map(|n| view! { <span class="badge badge-outline">{n}</span> }).collect_view()}
                        </div>
                    </div>
                </Show>

                <Show when={
                    let size = size.clone();
                    move || !size.is_empty()
                }>
                    <p class="text-sm text-base-content/60 mb-8">"Size: " {size.clone()}</p>
                </Show>

                <div class="flex items-center gap-4 mb-6">
                    <div class="join">
                        <button
                            class="btn join-item"
                            aria-label="Decrease quantity"
                            disabled={move || quantity.get() <= 1}
                            on:click=move |_| set_quantity.update(|q| *q = q.saturating_sub(1).max(1))
                        >
                            <Minus attr:class="h-4 w-4" />
                        </button>
                        <span class="btn join-item no-animation pointer-events-none w-14">{quantity}</span>
                        <button
                            class="btn join-item"
                            aria-label="Increase quantity"
                            on:click=move |_| set_quantity.update(|q| *q += 1)
                        >
                            <Plus attr:class="h-4 w-4" />
                        </button>
                    </div>

                    <button class="btn btn-primary flex-1 gap-2 tracking-widest uppercase" on:click=on_add>
                        {move || if added.get() {
                            view! { <Check attr:class="h-4 w-4" /> <span>"Added to Cart"</span> }.into_any()
                        } else {
                            view! { <ShoppingBag attr:class="h-4 w-4" /> <span>"Add to Cart"</span> }.into_any()
                        }}
                    </button>
                </div>

                <p class="text-xs text-base-content/50">{shipping_hint}</p>
            </div>
        </div>
    }
}
