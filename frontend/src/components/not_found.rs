use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="text-center">
                <h1 class="font-serif text-6xl text-primary">"404"</h1>
                <p class="text-xl mt-4">"This page has evaporated."</p>
                <Link to="/products" class="btn btn-outline mt-8 tracking-widest uppercase">
                    "Return to the Collection"
                </Link>
            </div>
        </div>
    }
}
