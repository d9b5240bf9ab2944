//! 顶部导航与页脚

use leptos::prelude::*;
use maison_shared::route::AppRoute;

use crate::auth::use_auth;
use crate::cart::use_cart;
use crate::components::icons::{LogOut, Moon, Package, ShieldCheck, ShoppingBag, Sun, UserIcon};
use crate::theme::use_theme;
use crate::web::router::{Link, use_router};

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let cart = use_cart();
    let theme = use_theme();
    let router = use_router();

    let item_count = move || cart.total_items();
    let is_admin = auth.is_admin_signal();
    let user = move || auth.user();

    let on_logout = move |_| {
        auth.logout();
        router.go(AppRoute::Login);
    };

    view! {
        <header class="navbar sticky top-0 z-50 bg-base-100/90 backdrop-blur border-b border-base-300 px-4 md:px-8">
            <div class="navbar-start">
                <Link to="/" class="font-serif text-xl tracking-[0.3em]">"MAISON NOIR"</Link>
            </div>
            <nav class="navbar-center hidden md:flex gap-8">
                <NavLink route=AppRoute::Home label="Home" />
                <NavLink route=AppRoute::Products label="Collection" />
                <Show when=move || is_admin.get()>
                    <NavLink route=AppRoute::Admin label="Admin" />
                </Show>
            </nav>
            <div class="navbar-end gap-1">
                <button
                    class="btn btn-ghost btn-circle"
                    aria-label="Toggle theme"
                    on:click=move |_| theme.toggle()
                >
                    {move || if theme.theme.get().is_dark() {
                        view! { <Sun attr:class="h-5 w-5" /> }.into_any()
                    } else {
                        view! { <Moon attr:class="h-5 w-5" /> }.into_any()
                    }}
                </button>

                <Link to="/cart" class="btn btn-ghost btn-circle">
                    <span class="indicator" node_ref=cart.animations.target>
                        <ShoppingBag attr:class="h-5 w-5" />
                        <Show when=move || { item_count() > 0 }>
                            <span class="badge badge-xs badge-primary indicator-item">{item_count}</span>
                        </Show>
                    </span>
                </Link>

                {move || match user() {
                    Some(user) => view! {
                        <div class="dropdown dropdown-end">
                            <div tabindex="0" role="button" class="btn btn-ghost btn-circle avatar placeholder">
                                <div class="bg-neutral text-neutral-content w-9 rounded-full">
                                    <span class="text-xs">{user.initials()}</span>
                                </div>
                            </div>
                            <ul tabindex="0" class="menu dropdown-content bg-base-100 rounded-box z-50 mt-3 w-56 p-2 shadow">
                                <li class="menu-title">
                                    <span>{user.name.clone()}</span>
                                    <span class="text-xs font-normal opacity-60">{user.email.clone()}</span>
                                </li>
                                <li><Link to="/account"><UserIcon attr:class="h-4 w-4" />"My Account"</Link></li>
                                <li><Link to="/orders"><Package attr:class="h-4 w-4" />"My Orders"</Link></li>
                                <Show when=move || is_admin.get()>
                                    <li><Link to="/admin"><ShieldCheck attr:class="h-4 w-4" />"Admin"</Link></li>
                                </Show>
                                <li><button on:click=on_logout><LogOut attr:class="h-4 w-4" />"Sign Out"</button></li>
                            </ul>
                        </div>
                    }.into_any(),
                    None => view! {
                        <Link to="/login" class="btn btn-ghost btn-sm tracking-widest uppercase">"Sign In"</Link>
                    }.into_any(),
                }}
            </div>
        </header>
    }
}

/// 带当前页高亮的导航链接
#[component]
fn NavLink(route: AppRoute, label: &'static str) -> impl IntoView {
    let router = use_router();
    let href = route.to_path();
    let target = route.clone();

    let class = move || {
        if router.current_route().with(|current| *current == route) {
            "text-sm tracking-widest uppercase text-primary"
        } else {
            "text-sm tracking-widest uppercase hover:text-primary transition-colors"
        }
    };

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.go(target.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {label}
        </a>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer footer-center bg-base-200 text-base-content/70 p-10 mt-16">
            <aside class="gap-2">
                <p class="font-serif text-lg tracking-[0.3em] text-base-content">"MAISON NOIR"</p>
                <p class="text-sm">"Luxury fragrances crafted with rare botanicals and precious essences."</p>
            </aside>
            <nav class="grid grid-flow-col gap-6 text-sm">
                <Link to="/products">"Collection"</Link>
                <Link to="/orders">"Orders"</Link>
                <a href="mailto:concierge@maisonnoir.com">"Concierge"</a>
            </nav>
        </footer>
    }
}
