use leptos::prelude::*;
use maison_shared::catalog::Product;
use maison_shared::pricing::format_price;

use crate::cart::use_cart;
use crate::components::icons::ShoppingBag;
use crate::web::router::Link;

#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let cart = use_cart();
    let href = format!("/products/{}", product.id);
    let price = format_price(product.price);
    let category = product.category_name.clone();
    let featured = product.featured;
    let name = product.name.clone();
    let image = product.image_url.clone();
    let alt = name.clone();

    let on_add = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let origin = (f64::from(ev.client_x()), f64::from(ev.client_y()));
        cart.add_to_cart(&product, 1, Some(origin));
    };

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow group">
            <Link to=href.clone() class="block overflow-hidden rounded-t-box">
                <figure class="relative aspect-[3/4] bg-base-200">
                    <img
                        src=image
                        alt=alt
                        loading="lazy"
                        class="h-full w-full object-cover transition-transform duration-700 group-hover:scale-105"
                    />
                    <Show when=move || featured>
                        <span class="badge badge-primary absolute left-3 top-3">"Signature"</span>
                    </Show>
                </figure>
            </Link>
            <div class="card-body p-5 gap-1">
                <p class="text-xs tracking-[0.2em] uppercase text-base-content/50">{category}</p>
                <Link to=href class="font-serif text-lg font-medium hover:underline">
                    {name}
                </Link>
                <div class="flex items-center justify-between pt-3">
                    <span class="font-serif text-xl">{price}</span>
                    <button class="btn btn-sm btn-outline gap-2" on:click=on_add>
                        <ShoppingBag attr:class="h-4 w-4" />
                        "Add"
                    </button>
                </div>
            </div>
        </div>
    }
}
