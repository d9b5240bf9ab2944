//! 结算页
//!
//! 阶段: Reviewing -> Processing -> Complete。
//! 处理中禁用下单按钮；失败回到 Reviewing 并在页面内显示错误。

mod confirmation;

use leptos::prelude::*;
use leptos::task::spawn_local;
use maison_shared::ValidationError;
use maison_shared::checkout::{CheckoutFlow, PaymentMethod};
use maison_shared::date::Timestamp;
use maison_shared::pricing::format_price;

use crate::auth::use_auth;
use crate::cart::use_cart;
use crate::components::cart::SummaryRows;
use crate::components::feedback::InlineError;
use crate::components::icons::{Banknote, CreditCard};
use crate::web::router::Link;

use confirmation::OrderConfirmationView;

fn now() -> Timestamp {
    Timestamp::from(js_sys::Date::now() as i64)
}

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let auth = use_auth();
    let cart = use_cart();
    let flow = RwSignal::new(CheckoutFlow::default());

    let processing = move || flow.with(CheckoutFlow::is_processing);
    let error = Signal::derive(move || flow.with(|f| f.error.clone()));

    let on_place_order = move |_| {
        let snapshot = cart.cart.get_untracked();
        let request = match flow.try_update(|f| f.begin(&snapshot)) {
            Some(Ok(request)) => request,
            Some(Err(ValidationError::AlreadyProcessing)) | None => return,
            Some(Err(e)) => {
                flow.update(|f| f.error = Some(e.to_string()));
                return;
            }
        };

        // 下单结果会清空全局购物车，因此即使页面已卸载也要处理
        let api = auth.api();
        spawn_local(async move {
            match api.place_order(&request, &snapshot, now()).await {
                Ok(confirmation) => {
                    cart.clear();
                    flow.try_update(|f| f.complete(confirmation));
                }
                Err(e) => {
                    log::warn!("order placement failed: {}", e);
                    flow.try_update(|f| f.fail(e.user_message()));
                }
            }
        });
    };

    view! {
        <div class="mx-auto max-w-6xl px-6 py-12">
            {move || match flow.with(|f| f.confirmation().cloned()) {
                Some(confirmation) => view! { <OrderConfirmationView confirmation=confirmation /> }.into_any(),
                None if cart.cart.with(|c| c.is_empty()) && !processing() => view! {
                    <div class="flex flex-col items-center gap-6 py-24 text-center">
                        <p class="text-lg text-base-content/70">"Your bag is empty."</p>
                        <Link to="/products" class="btn btn-primary tracking-widest uppercase">"Discover Fragrances"</Link>
                    </div>
                }.into_any(),
                None => view! {
                    <h1 class="font-serif text-4xl mb-10">"Checkout"</h1>
                    <div class="grid gap-10 lg:grid-cols-3">
                        <div class="lg:col-span-2 space-y-8">
                            <section>
                                <h2 class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-4">"Items"</h2>
                                <ul class="divide-y divide-base-300">
                                    {cart.cart.with(|c| {
                                        c.lines().iter().map(|line| view! {
                                            <li class="flex items-center gap-4 py-4">
                                                <img src=line.image.clone() alt="" class="h-16 w-14 rounded object-cover bg-base-200" />
                                                <div class="flex-1">
                                                    <p class="font-serif">{line.name.clone()}</p>
                                                    <p class="text-sm text-base-content/60">"Qty " {line.quantity}</p>
                                                </div>
                                                <span>{format_price(line.line_total())}</span>
                                            </li>
                                        }).collect_view()
                                    })}
                                </ul>
                            </section>

                            <section>
                                <h2 class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-4">"Payment Method"</h2>
                                <div class="grid gap-4 sm:grid-cols-2">
                                    <PaymentOption flow=flow method=PaymentMethod::Online />
                                    <PaymentOption flow=flow method=PaymentMethod::Cash />
                                </div>
                            </section>
                        </div>

                        <aside class="card bg-base-200 h-fit">
                            <div class="card-body gap-4">
                                <h2 class="card-title font-serif">"Order Summary"</h2>
                                <SummaryRows summary=Signal::derive(move || cart.summary()) />
                                <InlineError message=error />
                                <button
                                    class="btn btn-primary w-full tracking-widest uppercase"
                                    disabled=processing
                                    on:click=on_place_order
                                >
                                    {move || if processing() {
                                        view! { <span class="loading loading-spinner"></span> "Processing..." }.into_any()
                                    } else {
                                        "Place Order".into_any()
                                    }}
                                </button>
                            </div>
                        </aside>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn PaymentOption(flow: RwSignal<CheckoutFlow>, method: PaymentMethod) -> impl IntoView {
    let selected = move || flow.with(|f| f.payment_method == Some(method));
    let icon = match method {
        PaymentMethod::Online => view! { <CreditCard attr:class="h-6 w-6" /> }.into_any(),
        PaymentMethod::Cash => view! { <Banknote attr:class="h-6 w-6" /> }.into_any(),
    };
    let hint = match method {
        PaymentMethod::Online => "Card, UPI or net banking",
        PaymentMethod::Cash => "Pay when your order arrives",
    };

    view! {
        <button
            type="button"
            class=move || {
                if selected() {
                    "card border-2 border-primary bg-base-100 text-left"
                } else {
                    "card border border-base-300 bg-base-100 text-left hover:border-primary/50"
                }
            }
            disabled=move || flow.with(CheckoutFlow::is_processing)
            on:click=move |_| {
                flow.update(|f| {
                    f.select_payment(method);
                });
            }
        >
            <div class="card-body flex-row items-center gap-4 p-5">
                {icon}
                <div>
                    <p class="font-medium">{method.label()}</p>
                    <p class="text-xs text-base-content/60">{hint}</p>
                </div>
            </div>
        </button>
    }
}
