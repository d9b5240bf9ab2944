//! 商品表单状态
//!
//! 每个输入框一个 `RwSignal`，打开表单时从 `ProductDraft` 装载，
//! 提交时再组装回 `ProductDraft`。价格以文本保存，提交时解析。

use leptos::prelude::*;
use maison_shared::Decimal;
use maison_shared::ValidationError;
use maison_shared::catalog::ProductDraft;

/// 使用 `RwSignal` 因为它实现了 `Copy`，可以直接作为 Props 传递
#[derive(Clone, Copy)]
pub struct FormState {
    pub name: RwSignal<String>,
    pub description: RwSignal<String>,
    pub price: RwSignal<String>,
    pub image_url: RwSignal<String>,
    pub notes: RwSignal<String>,
    pub size: RwSignal<String>,
    pub category_name: RwSignal<String>,
    pub featured: RwSignal<bool>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            image_url: RwSignal::new(String::new()),
            notes: RwSignal::new(String::new()),
            size: RwSignal::new(String::new()),
            category_name: RwSignal::new(String::new()),
            featured: RwSignal::new(false),
        }
    }

    /// 用草稿覆盖所有字段；新建时价格留空
    pub fn load(&self, draft: &ProductDraft) {
        self.name.set(draft.name.clone());
        self.description.set(draft.description.clone());
        self.price.set(if draft.price.is_zero() {
            String::new()
        } else {
            draft.price.to_string()
        });
        self.image_url.set(draft.image_url.clone());
        self.notes.set(draft.notes.clone());
        self.size.set(draft.size.clone());
        self.category_name.set(draft.category_name.clone());
        self.featured.set(draft.featured);
    }

    pub fn to_draft(&self) -> Result<ProductDraft, ValidationError> {
        let price = self
            .price
            .get_untracked()
            .trim()
            .parse::<Decimal>()
            .map_err(|_| ValidationError::MissingFields)?;

        let draft = ProductDraft {
            name: self.name.get_untracked().trim().to_string(),
            description: self.description.get_untracked(),
            price,
            image_url: self.image_url.get_untracked().trim().to_string(),
            notes: self.notes.get_untracked(),
            size: self.size.get_untracked().trim().to_string(),
            category_name: self.category_name.get_untracked().trim().to_string(),
            featured: self.featured.get_untracked(),
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
