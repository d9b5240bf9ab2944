//! 下单成功后的确认视图
//!
//! 临时订单号只用于展示；跳转订单详情只使用后端返回的 id。

use leptos::prelude::*;
use maison_shared::checkout::OrderConfirmation;
use maison_shared::pricing::format_price;

use crate::components::cart::SummaryRows;
use crate::components::icons::{Check, Truck};
use crate::web::router::Link;

#[component]
pub fn OrderConfirmationView(confirmation: OrderConfirmation) -> impl IntoView {
    let summary = confirmation.summary;
    let detail_link = confirmation
        .order_id()
        .map(|id| view! { <Link to=format!("/orders/{}", id) class="btn btn-primary tracking-widest uppercase">"View Order"</Link> });

    view! {
        <div class="mx-auto max-w-2xl text-center">
            <div class="mx-auto mb-6 flex h-16 w-16 items-center justify-center rounded-full bg-success/15 text-success">
                <Check attr:class="h-8 w-8" />
            </div>
            <h1 class="font-serif text-4xl mb-3">"Thank You"</h1>
            <p class="text-base-content/70 mb-2">"Your order has been placed."</p>
            <p class="font-mono text-lg mb-10">{confirmation.order_number.to_string()}</p>

            <div class="card bg-base-200 text-left">
                <div class="card-body gap-4">
                    <ul class="divide-y divide-base-300">
                        {confirmation.lines.iter().map(|line| view! {
                            <li class="flex justify-between py-3 text-sm">
                                <span>{line.name.clone()} " × " {line.quantity}</span>
                                <span>{format_price(line.line_total())}</span>
                            </li>
                        }).collect_view()}
                    </ul>
                    <SummaryRows summary=Signal::derive(move || summary) />
                    <div class="flex justify-between text-sm">
                        <span class="text-base-content/70">"Payment"</span>
                        <span>{confirmation.payment_method.label()}</span>
                    </div>
                    <div class="flex items-center gap-2 text-sm text-base-content/70">
                        <Truck attr:class="h-4 w-4" />
                        <span>"Estimated delivery: " {confirmation.estimated_delivery}</span>
                    </div>
                </div>
            </div>

            <div class="mt-10 flex justify-center gap-4">
                {detail_link}
                <Link to="/orders" class="btn btn-outline tracking-widest uppercase">"My Orders"</Link>
                <Link to="/products" class="btn btn-ghost tracking-widest uppercase">"Continue Shopping"</Link>
            </div>
        </div>
    }
}
