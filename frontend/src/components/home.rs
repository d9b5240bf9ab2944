use leptos::prelude::*;
use maison_shared::catalog::Product;
use maison_shared::pricing::{FREE_SHIPPING_THRESHOLD, format_price};

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock};
use crate::components::icons::{Sparkles, Truck};
use crate::components::product_card::ProductCard;
use crate::mount::{spawn_guarded, use_cancel_token};
use crate::web::router::Link;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();

    let (featured, set_featured) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    let api = auth.api();
    spawn_guarded(&token, async move { api.featured_products().await }, move |result| {
        match result {
            Ok(products) => set_featured.set(products),
            Err(e) => {
                log::warn!("featured products: {}", e);
                set_error.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    view! {
        <section class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content text-center max-w-3xl flex-col gap-6 py-24">
                <p class="text-xs tracking-[0.3em] uppercase text-base-content/60">"Maison de Parfum"</p>
                <h1 class="font-serif text-5xl md:text-7xl font-medium leading-tight">
                    "The Art of Scent"
                </h1>
                <p class="max-w-xl text-base-content/70 leading-relaxed">
                    "Rare botanicals and precious essences, composed by hand into fragrances that linger like memory."
                </p>
                <Link to="/products" class="btn btn-primary btn-wide tracking-widest uppercase">
                    "Explore the Collection"
                </Link>
            </div>
        </section>

        <section class="mx-auto max-w-7xl px-6 py-20">
            <div class="mb-12 text-center">
                <p class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-3">"Curated Selection"</p>
                <h2 class="font-serif text-4xl">"Signature Fragrances"</h2>
            </div>

            <InlineError message=error />

            <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock /> }>
                <Show
                    when=move || featured.with(|p| !p.is_empty())
                    fallback=move || view! {
                        <Show when=move || error.with(Option::is_none)>
                            <p class="text-center text-base-content/60">"New signatures are on their way."</p>
                        </Show>
                    }
                >
                    <div class="grid gap-8 sm:grid-cols-2 lg:grid-cols-3">
                        <For each=move || featured.get() key=|p| p.id let:product>
                            <ProductCard product=product />
                        </For>
                    </div>
                </Show>
            </Show>
        </section>

        <section class="bg-base-200">
            <div class="mx-auto grid max-w-5xl gap-10 px-6 py-16 md:grid-cols-2">
                <div class="flex gap-4">
                    <Truck attr:class="h-8 w-8 shrink-0 text-primary" />
                    <div>
                        <h3 class="font-serif text-xl mb-1">"Complimentary Shipping"</h3>
                        <p class="text-sm text-base-content/70">
                            {format!("On every order over {}.", format_price(FREE_SHIPPING_THRESHOLD))}
                        </p>
                    </div>
                </div>
                <div class="flex gap-4">
                    <Sparkles attr:class="h-8 w-8 shrink-0 text-primary" />
                    <div>
                        <h3 class="font-serif text-xl mb-1">"Crafted in Small Batches"</h3>
                        <p class="text-sm text-base-content/70">
                            "Each bottle is filled and finished by hand in our atelier."
                        </p>
                    </div>
                </div>
            </div>
        </section>
    }
}
