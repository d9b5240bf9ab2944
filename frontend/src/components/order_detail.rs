use leptos::prelude::*;
use maison_shared::Decimal;
use maison_shared::error::ApiErrorKind;
use maison_shared::order::{Order, OrderItem};
use maison_shared::pricing::format_price;
use maison_shared::route::AppRoute;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock};
use crate::components::icons::{Check, ChevronLeft, MapPin, XIcon};
use crate::components::not_found::NotFoundPage;
use crate::components::orders::StatusBadge;
use crate::mount::{spawn_guarded, use_cancel_token};
use crate::web::router::{Link, use_router};

enum Loaded {
    Pending,
    Found(Order),
    Missing,
    Failed(String),
}

#[component]
pub fn OrderDetailPage(id: i64) -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();
    let state = RwSignal::new(Loaded::Pending);

    let api = auth.api();
    spawn_guarded(&token, async move { api.fetch_order(id).await }, move |result| {
        state.set(match result {
            Ok(order) => Loaded::Found(order),
            Err(e) if e.kind == ApiErrorKind::NotFound => Loaded::Missing,
            Err(e) => {
                log::warn!("order {}: {}", id, e);
                Loaded::Failed(e.user_message())
            }
        });
    });

    move || {
        state.with(|s| match s {
            Loaded::Pending => view! { <LoadingBlock label="Loading order" /> }.into_any(),
            Loaded::Missing => view! { <NotFoundPage /> }.into_any(),
            Loaded::Failed(message) => {
                let message = message.clone();
                view! {
                    <div class="mx-auto max-w-3xl px-6 py-12">
                        <InlineError message=Signal::derive(move || Some(message.clone())) />
                    </div>
                }.into_any()
            }
            Loaded::Found(order) => view! { <OrderDetails order=order.clone() /> }.into_any(),
        })
    }
}

#[component]
fn OrderDetails(order: Order) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let token = use_cancel_token();

    let cancelling = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let cancellable = order.can_cancel();
    let display = order.status.display();
    let is_cancelled = order.status.is_cancelled();
    let subtotal: Decimal = order.items.iter().map(OrderItem::line_total).sum();

    let stored = StoredValue::new(order.clone());
    let on_cancel = move |_| {
        if cancelling.get_untracked() {
            return;
        }
        let confirmed = window()
            .confirm_with_message("Cancel this order?")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        cancelling.set(true);
        error_msg.set(None);

        let order = stored.get_value();
        let api = auth.api();
        // 后端确认状态已变为 CANCELLED 后才返回列表
        spawn_guarded(&token, async move { api.cancel_order_confirmed(&order).await }, move |result| {
            match result {
                Ok(updated) => {
                    log::info!("order {} cancelled", updated.reference());
                    router.go(AppRoute::Orders);
                }
                Err(e) => {
                    error_msg.set(Some(e.user_message()));
                    cancelling.set(false);
                }
            }
        });
    };

    let address = order.shipping_address.clone().map(|line| {
        let locality = [order.city.clone(), order.pincode.clone()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (line, locality)
    });
    let placed_at = match order.formatted_time() {
        Some(time) => format!("{} at {}", order.formatted_date(), time),
        None => order.formatted_date(),
    };

    view! {
        <div class="mx-auto max-w-4xl px-6 py-12">
            <Link to="/orders" class="btn btn-ghost btn-sm gap-2 mb-8">
                <ChevronLeft attr:class="h-4 w-4" />
                "All Orders"
            </Link>

            <div class="flex flex-wrap items-start justify-between gap-4 mb-8">
                <div>
                    <p class="font-mono text-sm text-base-content/60">{order.reference()}</p>
                    <h1 class="font-serif text-3xl">{display.label}</h1>
                    <p class="text-base-content/70">{display.description}</p>
                    <p class="text-sm text-base-content/60 mt-1">{placed_at}</p>
                </div>
                <StatusBadge status=order.status.clone() />
            </div>

            <InlineError message=error_msg />

            {(!is_cancelled).then(|| view! {
                <ul class="steps w-full mb-10">
                    {order.status.timeline().into_iter().map(|(label, done)| view! {
                        <li class=if done { "step step-primary" } else { "step" }>{label}</li>
                    }).collect_view()}
                </ul>
            })}

            <div class="grid gap-8 md:grid-cols-3">
                <div class="md:col-span-2 card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title font-serif">"Items"</h2>
                        <ul class="divide-y divide-base-300">
                            {order.items.iter().map(|item| view! { <ItemRow item=item.clone() /> }).collect_view()}
                        </ul>
                    </div>
                </div>

                <aside class="space-y-6">
                    <div class="card bg-base-200">
                        <div class="card-body gap-2 text-sm">
                            <h2 class="card-title font-serif text-base">"Summary"</h2>
                            <div class="flex justify-between">
                                <span>"Subtotal"</span><span>{format_price(subtotal)}</span>
                            </div>
                            <div class="flex justify-between font-medium text-base">
                                <span>"Total"</span><span>{format_price(order.total_amount)}</span>
                            </div>
                            <div class="flex justify-between text-base-content/70">
                                <span>"Payment"</span><span>{order.payment_label().to_string()}</span>
                            </div>
                        </div>
                    </div>

                    {address.map(|(line, locality)| view! {
                        <div class="card bg-base-200">
                            <div class="card-body gap-1 text-sm">
                                <h2 class="card-title font-serif text-base">
                                    <MapPin attr:class="h-4 w-4" /> "Shipping To"
                                </h2>
                                <p>{line}</p>
                                <p class="text-base-content/70">{locality}</p>
                            </div>
                        </div>
                    })}

                    {if cancellable {
                        view! {
                            <button class="btn btn-outline btn-error w-full gap-2" on:click=on_cancel disabled=move || cancelling.get()>
                                <XIcon attr:class="h-4 w-4" />
                                {move || if cancelling.get() { "Cancelling..." } else { "Cancel Order" }}
                            </button>
                        }.into_any()
                    } else {
                        view! {
                            <p class="flex items-center gap-2 text-sm text-base-content/60">
                                <Check attr:class="h-4 w-4" />
                                "This order can no longer be cancelled."
                            </p>
                        }.into_any()
                    }}
                </aside>
            </div>
        </div>
    }
}

#[component]
fn ItemRow(item: OrderItem) -> impl IntoView {
    let total = format_price(item.line_total());
    view! {
        <li class="flex items-center gap-4 py-4">
            {item.perfume.image_url.clone().map(|src| view! {
                <img src=src alt=item.perfume.name.clone() class="h-16 w-16 rounded object-cover" />
            })}
            <div class="flex-1">
                <p class="font-medium">{item.perfume.name.clone()}</p>
                <p class="text-sm text-base-content/60">
                    {format!("{} × {}", item.quantity, format_price(item.price))}
                </p>
            </div>
            <p class="font-medium">{total}</p>
        </li>
    }
}
