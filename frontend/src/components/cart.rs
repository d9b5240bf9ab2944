use leptos::prelude::*;
use maison_shared::CartLineItem;
use maison_shared::pricing::{PriceSummary, amount_to_free_shipping, format_price};
use maison_shared::route::AppRoute;

use crate::cart::use_cart;
use crate::components::icons::{Minus, Plus, ShoppingBag, Trash};
use crate::web::router::{Link, use_router};

#[component]
pub fn CartPage() -> impl IntoView {
    let cart = use_cart();
    let router = use_router();

    let is_empty = move || cart.cart.with(|c| c.is_empty());
    let lines = move || cart.cart.with(|c| c.lines().to_vec());

    view! {
        <div class="mx-auto max-w-6xl px-6 py-12">
            <h1 class="font-serif text-4xl mb-10">"Your Bag"</h1>

            <Show when=move || !is_empty() fallback=|| view! { <EmptyCart /> }>
                <div class="grid gap-10 lg:grid-cols-3">
                    <ul class="lg:col-span-2 divide-y divide-base-300">
                        <For each=lines key=|line| (line.id.clone(), line.quantity) let:line>
                            <CartLine line=line />
                        </For>
                    </ul>

                    <aside class="card bg-base-200 h-fit">
                        <div class="card-body gap-4">
                            <h2 class="card-title font-serif">"Order Summary"</h2>
                            <SummaryRows summary=Signal::derive(move || cart.summary()) />
                            <button
                                class="btn btn-primary w-full tracking-widest uppercase"
                                on:click=move |_| router.go(AppRoute::Checkout)
                            >
                                "Proceed to Checkout"
                            </button>
                            <Link to="/products" class="btn btn-ghost btn-sm">"Continue Shopping"</Link>
                        </div>
                    </aside>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn EmptyCart() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center gap-6 py-24 text-center">
            <ShoppingBag attr:class="h-16 w-16 text-base-content/30" />
            <p class="text-lg text-base-content/70">"Your bag is empty."</p>
            <Link to="/products" class="btn btn-primary tracking-widest uppercase">"Discover Fragrances"</Link>
        </div>
    }
}

#[component]
fn CartLine(line: CartLineItem) -> impl IntoView {
    let cart = use_cart();
    let id = StoredValue::new(line.id.clone());
    let quantity = line.quantity;
    let name = line.name.clone();

    view! {
        <li class="flex gap-6 py-6">
            <img src=line.image.clone() alt=line.name.clone() class="h-28 w-24 rounded-box object-cover bg-base-200" />
            <div class="flex flex-1 flex-col justify-between">
                <div class="flex justify-between gap-4">
                    <Link to=format!("/products/{}", line.perfume_id) class="font-serif text-lg hover:underline">
                        {name}
                    </Link>
                    <span class="font-serif text-lg">{format_price(line.line_total())}</span>
                </div>
                <p class="text-sm text-base-content/60">{format_price(line.price)} " each"</p>
                <div class="flex items-center justify-between">
                    <div class="join">
                        // 减到 1 为止；删除只能通过移除按钮
                        <button
                            class="btn btn-sm join-item"
                            aria-label="Decrease quantity"
                            disabled={quantity <= 1}
                            on:click=move |_| id.with_value(|id| cart.decrement(id))
                        >
                            <Minus attr:class="h-3 w-3" />
                        </button>
                        <span class="btn btn-sm join-item no-animation pointer-events-none w-12">{quantity}</span>
                        <button
                            class="btn btn-sm join-item"
                            aria-label="Increase quantity"
                            on:click=move |_| id.with_value(|id| cart.increment(id))
                        >
                            <Plus attr:class="h-3 w-3" />
                        </button>
                    </div>
                    <button
                        class="btn btn-ghost btn-sm gap-1 text-error"
                        on:click=move |_| id.with_value(|id| cart.remove(id))
                    >
                        <Trash attr:class="h-4 w-4" />
                        "Remove"
                    </button>
                </div>
            </div>
        </li>
    }
}

/// 小计 / 运费 / 合计，购物车页与结算页共用
#[component]
pub fn SummaryRows(#[prop(into)] summary: Signal<PriceSummary>) -> impl IntoView {
    let shipping_label = move || {
        let s = summary.get();
        if s.is_free_shipping() {
            "Free".to_string()
        } else {
            format_price(s.shipping)
        }
    };
    let remaining = move || amount_to_free_shipping(summary.get().subtotal);

    view! {
        <div class="space-y-2 text-sm">
            <div class="flex justify-between">
                <span class="text-base-content/70">"Subtotal"</span>
                <span>{move || format_price(summary.get().subtotal)}</span>
            </div>
            <div class="flex justify-between">
                <span class="text-base-content/70">"Shipping"</span>
                <span>{shipping_label}</span>
            </div>
            <Show when=move || !remaining().is_zero()>
                <p class="text-xs text-primary">
                    {move || format!("Add {} more for complimentary shipping", format_price(remaining()))}
                </p>
            </Show>
            <div class="divider my-1"></div>
            <div class="flex justify-between font-serif text-lg">
                <span>"Total"</span>
                <span>{move || format_price(summary.get().total)}</span>
            </div>
        </div>
    }
}
