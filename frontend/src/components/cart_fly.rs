//! "飞入购物车"覆盖层
//!
//! 每个气泡从点击位置出发，通过 CSS 变量 `--dx` / `--dy` 飞向导航栏图标。

use leptos::prelude::*;

use crate::cart::{FlyingItem, use_cart};

#[component]
pub fn CartFlyOverlay() -> impl IntoView {
    let cart = use_cart();
    let flights = cart.animations.flights;

    view! {
        <div class="pointer-events-none fixed inset-0 z-[100]" aria-hidden="true">
            <For each=move || flights.get() key=|item| item.id let:item>
                <Bubble item=item />
            </For>
        </div>
    }
}

#[component]
fn Bubble(item: FlyingItem) -> impl IntoView {
    let (x, y) = item.from;
    let style = format!(
        "left: {}px; top: {}px; --dx: {}px; --dy: {}px;",
        x - 24.0,
        y - 24.0,
        item.to.0 - x,
        item.to.1 - y,
    );

    view! {
        <div class="cart-bubble absolute h-12 w-12 overflow-hidden rounded-full shadow-xl ring-2 ring-primary" style=style>
            <img src=item.image alt="" class="h-full w-full object-cover" />
        </div>
    }
}
