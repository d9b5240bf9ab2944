//! 购物车
//!
//! 行项目按插入顺序保存，`id` 唯一。数量在这一层被钳制为 ≥ 1，
//! 删除最后一件商品只能通过 `remove` 完成。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::STORAGE_CART_KEY;
use crate::catalog::Product;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    pub perfume_id: i64,
    pub name: String,
    /// 加入购物车时的价格快照
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// 待加入的商品（不含数量）
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub id: String,
    pub perfume_id: i64,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

impl NewCartItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            perfume_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image_url.clone(),
        }
    }

    fn with_quantity(self, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: self.id,
            perfume_id: self.perfume_id,
            name: self.name,
            price: self.price,
            image: self.image,
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 同 id 的行累加数量，否则追加到末尾。数量 0 视为 1。
    pub fn add(&mut self, item: NewCartItem, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(item.with_quantity(quantity));
        }
    }

    /// 设置数量（最小为 1）。id 不存在时返回 false。
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> bool {
        match self.lines.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    pub fn increment(&mut self, id: &str) -> bool {
        let next = self.get(id).map(|l| l.quantity.saturating_add(1));
        next.is_some_and(|q| self.update_quantity(id, q))
    }

    /// 数量减一，停在 1
    pub fn decrement(&mut self, id: &str) -> bool {
        let next = self.get(id).map(|l| l.quantity.saturating_sub(1));
        next.is_some_and(|q| self.update_quantity(id, q))
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| l.quantity)
            .fold(0u32, u32::saturating_add)
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    // =========================================================
    // 持久化
    // =========================================================

    /// 读取持久化的购物车；缺失或损坏时返回空购物车
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let Some(raw) = store.get(STORAGE_CART_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(stored) => Self::repaired(stored),
            Err(e) => {
                log::warn!("discarding unreadable cart: {}", e);
                store.delete(STORAGE_CART_KEY);
                Self::default()
            }
        }
    }

    /// 修复手工改动或旧版本留下的数据：数量至少为 1，同 id 的行合并到首次出现的位置
    fn repaired(stored: Cart) -> Self {
        let mut cart = Self::new();
        for mut line in stored.lines {
            line.quantity = line.quantity.max(1);
            match cart.lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// best-effort 写入，失败只记录日志
    pub fn save<S: KeyValueStore>(&self, store: &S) -> bool {
        let saved = serde_json::to_string(self)
            .map(|json| store.set(STORAGE_CART_KEY, &json))
            .unwrap_or(false);
        if !saved {
            log::warn!("failed to persist cart ({} lines)", self.lines.len());
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use rust_decimal_macros::dec;

    fn item(id: &str, perfume_id: i64, price: Decimal) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            perfume_id,
            name: id.replace('-', " "),
            price,
            image: format!("/images/perfume-{}.jpg", id),
        }
    }

    #[test]
    fn test_add_same_id_increments() {
        let mut cart = Cart::new();
        cart.add(item("noir-absolu", 1, dec!(295)), 1);
        cart.add(item("noir-absolu", 1, dec!(295)), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.get("noir-absolu").unwrap().quantity, 3);
    }

    #[test]
    fn test_totals_example_order() {
        let mut cart = Cart::new();
        cart.add(item("noir-absolu", 1, dec!(295)), 1);
        cart.add(item("rose-eternelle", 2, dec!(245)), 2);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), dec!(785));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(item("velvet-soir", 3, dec!(275)), 1);
        cart.add(item("blanc-celeste", 6, dec!(255)), 1);
        cart.add(item("velvet-soir", 3, dec!(275)), 1);

        let ids: Vec<_> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["velvet-soir", "blanc-celeste"]);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(item("lumiere-dor", 4, dec!(325)), 2);

        assert!(cart.update_quantity("lumiere-dor", 0));
        assert_eq!(cart.get("lumiere-dor").unwrap().quantity, 1);
        assert!(!cart.update_quantity("missing", 5));
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut cart = Cart::new();
        cart.add(item("ombre-mystique", 5, dec!(285)), 2);

        cart.decrement("ombre-mystique");
        cart.decrement("ombre-mystique");
        cart.decrement("ombre-mystique");
        assert_eq!(cart.get("ombre-mystique").unwrap().quantity, 1);

        cart.increment("ombre-mystique");
        assert_eq!(cart.get("ombre-mystique").unwrap().quantity, 2);
    }

    #[test]
    fn test_add_zero_quantity_adds_one() {
        let mut cart = Cart::new();
        cart.add(item("noir-absolu", 1, dec!(295)), 0);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(item("noir-absolu", 1, dec!(295)), 1);
        cart.add(item("rose-eternelle", 2, dec!(245)), 2);

        assert!(cart.remove("noir-absolu"));
        assert!(!cart.remove("noir-absolu"));
        assert_eq!(cart.total_price(), dec!(490));

        cart.clear();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_hold_across_operation_sequences() {
        let mut cart = Cart::new();
        let catalog = [
            ("a", dec!(10.5)),
            ("b", dec!(99.99)),
            ("c", dec!(245)),
        ];

        // 固定的伪随机操作序列，每一步之后校验派生值
        for step in 0..60u32 {
            let (id, price) = catalog[(step % 3) as usize];
            match step % 5 {
                0 | 1 => cart.add(item(id, step as i64, price), step % 4),
                2 => {
                    cart.update_quantity(id, step % 7);
                }
                3 => {
                    cart.decrement(id);
                }
                _ => {
                    if step % 10 == 4 {
                        cart.remove(id);
                    }
                }
            }

            let expected_items: u32 = cart.lines().iter().map(|l| l.quantity).sum();
            let expected_price: Decimal = cart
                .lines()
                .iter()
                .map(|l| l.price * Decimal::from(l.quantity))
                .sum();
            assert_eq!(cart.total_items(), expected_items);
            assert_eq!(cart.total_price(), expected_price);
            assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        }
    }

    #[test]
    fn test_persistence_roundtrip_and_corruption() {
        let store = MemoryStore::new();
        let mut cart = Cart::new();
        cart.add(item("rose-eternelle", 2, dec!(245)), 2);
        assert!(cart.save(&store));

        let raw = store.get(STORAGE_CART_KEY).unwrap();
        assert!(raw.contains("\"perfumeId\":2"));
        assert_eq!(Cart::load(&store), cart);

        store.set(STORAGE_CART_KEY, "{not json");
        assert!(Cart::load(&store).is_empty());
        assert!(store.get(STORAGE_CART_KEY).is_none());
    }

    #[test]
    fn test_load_repairs_zero_quantities() {
        let store = MemoryStore::new();
        store.set(
            STORAGE_CART_KEY,
            r#"[{"id":"x","perfumeId":7,"name":"X","price":120,"image":"","quantity":0}]"#,
        );
        let cart = Cart::load(&store);
        assert_eq!(cart.get("x").unwrap().quantity, 1);
        assert_eq!(cart.total_price(), dec!(120));
    }

    #[test]
    fn test_load_merges_duplicate_ids() {
        let store = MemoryStore::new();
        store.set(
            STORAGE_CART_KEY,
            r#"[{"id":"x","perfumeId":7,"name":"X","price":120,"image":"","quantity":2},
                {"id":"y","perfumeId":8,"name":"Y","price":80,"image":"","quantity":1},
                {"id":"x","perfumeId":7,"name":"X","price":120,"image":"","quantity":0}]"#,
        );
        let cart = Cart::load(&store);

        let ids: Vec<_> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(cart.get("x").unwrap().quantity, 3);
        assert_eq!(cart.total_price(), dec!(440));
    }

    #[test]
    fn test_total_items_saturates() {
        let mut cart = Cart::new();
        cart.add(item("noir-absolu", 1, dec!(295)), u32::MAX);
        cart.add(item("rose-eternelle", 2, dec!(245)), 5);

        assert_eq!(cart.get("noir-absolu").unwrap().quantity, u32::MAX);
        assert_eq!(cart.total_items(), u32::MAX);
    }
}
