//! 购物车上下文
//!
//! 每次修改后立即写回 LocalStorage。"飞入购物车"动画通过
//! `CartAnimationBus` 显式传递：导航栏登记图标位置，覆盖层渲染飞行中的气泡。

use std::time::Duration;

use leptos::html::Span;
use leptos::prelude::*;
use maison_shared::catalog::Product;
use maison_shared::pricing::PriceSummary;
use maison_shared::{Cart, NewCartItem};

use crate::web::LocalStorage;

/// 气泡飞行时长，与 index.html 中的 `fly-to-cart` 动画一致
pub const FLIGHT_MS: u64 = 700;

#[derive(Debug, Clone, PartialEq)]
pub struct FlyingItem {
    pub id: u64,
    pub image: String,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

#[derive(Clone, Copy)]
pub struct CartAnimationBus {
    /// 导航栏中的购物车图标
    pub target: NodeRef<Span>,
    pub flights: RwSignal<Vec<FlyingItem>>,
    next_id: StoredValue<u64>,
}

impl CartAnimationBus {
    fn new() -> Self {
        Self {
            target: NodeRef::new(),
            flights: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    fn target_center(&self) -> Option<(f64, f64)> {
        let rect = self.target.get_untracked()?.get_bounding_client_rect();
        Some((
            rect.left() + rect.width() / 2.0,
            rect.top() + rect.height() / 2.0,
        ))
    }

    /// 从 `from` 发射一个气泡；图标不可见时不播放
    pub fn launch(&self, from: (f64, f64), image: String) {
        let Some(to) = self.target_center() else {
            return;
        };
        let id = self.next_id.get_value();
        self.next_id.set_value(id.wrapping_add(1));

        self.flights.update(|f| {
            f.push(FlyingItem {
                id,
                image,
                from,
                to,
            })
        });

        let flights = self.flights;
        set_timeout(
            move || flights.update(|f| f.retain(|item| item.id != id)),
            Duration::from_millis(FLIGHT_MS),
        );
    }
}

/// 购物车上下文
#[derive(Clone, Copy)]
pub struct CartContext {
    pub cart: ReadSignal<Cart>,
    set_cart: WriteSignal<Cart>,
    pub animations: CartAnimationBus,
}

impl CartContext {
    pub fn new() -> Self {
        let (cart, set_cart) = signal(Cart::load(&LocalStorage));
        Self {
            cart,
            set_cart,
            animations: CartAnimationBus::new(),
        }
    }

    fn mutate(&self, f: impl FnOnce(&mut Cart)) {
        self.set_cart.update(|cart| {
            f(cart);
            if !cart.save(&LocalStorage) {
                log::warn!("cart could not be persisted");
            }
        });
    }

    /// 加入购物车；`origin` 为点击位置，用于播放飞入动画
    pub fn add_to_cart(&self, product: &Product, quantity: u32, origin: Option<(f64, f64)>) {
        let item = NewCartItem::from_product(product);
        let image = item.image.clone();
        self.mutate(|cart| cart.add(item, quantity));
        if let Some(from) = origin {
            self.animations.launch(from, image);
        }
    }

    pub fn update_quantity(&self, id: &str, quantity: u32) {
        self.mutate(|cart| {
            cart.update_quantity(id, quantity);
        });
    }

    pub fn increment(&self, id: &str) {
        self.mutate(|cart| {
            cart.increment(id);
        });
    }

    pub fn decrement(&self, id: &str) {
        self.mutate(|cart| {
            cart.decrement(id);
        });
    }

    pub fn remove(&self, id: &str) {
        self.mutate(|cart| {
            cart.remove(id);
        });
    }

    /// 下单成功后调用
    pub fn clear(&self) {
        self.mutate(Cart::clear);
    }

    pub fn total_items(&self) -> u32 {
        self.cart.with(Cart::total_items)
    }

    pub fn summary(&self) -> PriceSummary {
        self.cart.with(PriceSummary::for_cart)
    }
}

pub fn use_cart() -> CartContext {
    use_context::<CartContext>().expect("CartContext should be provided")
}

