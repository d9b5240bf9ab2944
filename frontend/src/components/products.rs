use leptos::prelude::*;
use maison_shared::catalog::Product;

use crate::auth::use_auth;
use crate::components::feedback::{InlineError, LoadingBlock};
use crate::components::product_card::ProductCard;
use crate::mount::{spawn_guarded, use_cancel_token};

const ALL_CATEGORIES: &str = "All";

#[component]
pub fn ProductsPage() -> impl IntoView {
    let auth = use_auth();
    let token = use_cancel_token();

    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);
    let (category, set_category) = signal(ALL_CATEGORIES.to_string());

    let api = auth.api();
    spawn_guarded(&token, async move { api.list_products().await }, move |result| {
        match result {
            Ok(list) => set_products.set(list),
            Err(e) => {
                log::warn!("product listing: {}", e);
                set_error.set(Some(e.user_message()));
            }
        }
        set_loading.set(false);
    });

    // 分类按首次出现的顺序排列
    let categories = Memo::new(move |_| {
        let mut names = vec![ALL_CATEGORIES.to_string()];
        products.with(|list| {
            for p in list {
                if !p.category_name.is_empty() && !names.contains(&p.category_name) {
                    names.push(p.category_name.clone());
                }
            }
        });
        names
    });

    let visible = move || {
        let selected = category.get();
        products.with(|list| {
            list.iter()
                .filter(|p| selected == ALL_CATEGORIES || p.category_name == selected)
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <section class="pt-20 pb-12 px-6 text-center">
            <p class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-4">"Discover Our World"</p>
            <h1 class="font-serif text-4xl md:text-6xl font-medium mb-6">"The Collection"</h1>
            <p class="max-w-xl mx-auto text-base-content/70 leading-relaxed">
                "Each fragrance in our collection is a masterpiece, crafted using the world's finest ingredients to evoke emotion and memory."
            </p>
        </section>

        <section class="mx-auto max-w-7xl px-6 pb-16">
            <InlineError message=error />

            <div class="flex flex-wrap justify-center gap-2 mb-10">
                <For each=move || categories.get() key=|c| c.clone() let:name>
                    {
                        let label = name.clone();
                        let is_active = {
                            let name = name.clone();
                            move || category.with(|c| *c == name)
                        };
                        view! {
                            <button
                                class=move || if is_active() { "btn btn-sm btn-primary" } else { "btn btn-sm btn-ghost" }
                                on:click=move |_| set_category.set(name.clone())
                            >
                                {label}
                            </button>
                        }
                    }
                </For>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading collection" /> }>
                <div class="grid gap-8 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4">
                    <For each=visible key=|p| p.id let:product>
                        <ProductCard product=product />
                    </For>
                </div>
            </Show>
        </section>

        <section class="py-16 px-6 bg-base-200">
            <div class="mx-auto max-w-2xl text-center">
                <p class="text-xs tracking-[0.3em] uppercase text-base-content/60 mb-4">"Personalized Service"</p>
                <h2 class="font-serif text-3xl mb-4">"Need Assistance?"</h2>
                <p class="text-base-content/70 leading-relaxed mb-8">
                    "Our fragrance consultants are available to help you find your signature scent."
                </p>
                <a href="mailto:concierge@maisonnoir.com" class="btn btn-outline tracking-widest uppercase">
                    "Contact Concierge"
                </a>
            </div>
        </section>
    }
}
