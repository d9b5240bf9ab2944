use leptos::prelude::*;
use maison_shared::order::{Order, OrderStatus, OrderSummary};
use maison_shared::pricing::format_price;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock};
use crate::components::icons::{Download, Package};
use crate::mount::{spawn_guarded, use_cancel_token};
use crate::web::download;
use crate::web::router::Link;

const EXPORT_FILENAME: &str = "orders.csv";

#[component]
pub fn OrdersPage() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();

    let orders = RwSignal::new(Option::<Vec<Order>>::None);
    let error_msg = RwSignal::new(Option::<String>::None);
    let exporting = RwSignal::new(false);

    let api = auth.api();
    spawn_guarded(&token, async move { api.fetch_my_orders().await }, move |result| {
        match result {
            Ok(list) => orders.set(Some(list)),
            Err(e) => {
                log::warn!("order history: {}", e);
                orders.set(Some(Vec::new()));
                error_msg.set(Some(e.user_message()));
            }
        }
    });

    let summary = Memo::new(move |_| orders.with(|o| OrderSummary::of(o.as_deref().unwrap_or_default())));

    let on_export = move |_| {
        if exporting.get_untracked() {
            return;
        }
        exporting.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_guarded(&token, async move { api.export_orders().await }, move |result| {
            match result.map(|csv| download::save_text(EXPORT_FILENAME, "text/csv", &csv)) {
                Ok(Ok(())) => log::info!("orders exported"),
                Ok(Err(e)) => {
                    log::error!("order export download failed: {:?}", e);
                    error_msg.set(Some("Could not save the export file".to_string()));
                }
                Err(e) => error_msg.set(Some(e.user_message())),
            }
            exporting.set(false);
        });
    };

    view! {
        <div class="mx-auto max-w-5xl px-6 py-12">
            <div class="flex flex-wrap items-end justify-between gap-4 mb-10">
                <div>
                    <p class="text-xs tracking-[0.3em] uppercase text-base-content/60">"Order History"</p>
                    <h1 class="font-serif text-4xl">"My Orders"</h1>
                </div>
                <button class="btn btn-outline btn-sm gap-2" on:click=on_export disabled=move || exporting.get()>
                    <Download attr:class="h-4 w-4" />
                    {move || if exporting.get() { "Exporting..." } else { "Export CSV" }}
                </button>
            </div>

            <InlineError message=error_msg />

            {move || match orders.get() {
                None => view! { <LoadingBlock label="Loading orders" /> }.into_any(),
                Some(list) if list.is_empty() => view! { <NoOrders /> }.into_any(),
                Some(list) => view! {
                    <SummaryStats summary=summary />
                    <div class="space-y-4">
                        {list.into_iter().map(|order| view! { <OrderRow order=order /> }).collect_view()}
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn SummaryStats(summary: Memo<OrderSummary>) -> impl IntoView {
    view! {
        <div class="stats stats-vertical sm:stats-horizontal shadow w-full mb-8">
            <div class="stat">
                <div class="stat-title">"Orders"</div>
                <div class="stat-value text-2xl">{move || summary.get().count}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Total Spent"</div>
                <div class="stat-value text-2xl">{move || format_price(summary.get().total_spent)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Delivered"</div>
                <div class="stat-value text-2xl">{move || summary.get().delivered}</div>
            </div>
        </div>
    }
}

#[component]
fn OrderRow(order: Order) -> impl IntoView {
    let href = format!("/orders/{}", order.id);
    let items = order.item_count();
    let item_label = if items == 1 { "item" } else { "items" };

    view! {
        <div class="card bg-base-100 shadow-sm border border-base-300">
            <div class="card-body flex-row flex-wrap items-center justify-between gap-4">
                <div>
                    <p class="font-mono text-sm text-base-content/60">{order.reference()}</p>
                    <p class="font-medium">{order.formatted_date()}</p>
                    <p class="text-sm text-base-content/60">{format!("{} {}", items, item_label)}</p>
                </div>
                <StatusBadge status=order.status.clone() />
                <p class="font-serif text-xl">{format_price(order.total_amount)}</p>
                <Link to=href class="btn btn-ghost btn-sm">"View Details"</Link>
            </div>
        </div>
    }
}

/// 状态徽章；未知状态按 PLACED 展示
#[component]
pub fn StatusBadge(status: OrderStatus) -> impl IntoView {
    let display = status.display();
    view! {
        <span class=format!("badge badge-lg {}", display.tone.css_class())>{display.label}</span>
    }
}

#[component]
fn NoOrders() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center gap-6 py-24 text-center">
            <Package attr:class="h-16 w-16 text-base-content/30" />
            <p class="text-lg text-base-content/70">"You haven't placed any orders yet."</p>
            <Link to="/products" class="btn btn-primary tracking-widest uppercase">"Start Shopping"</Link>
        </div>
    }
}
