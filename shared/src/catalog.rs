//! 商品目录与后台商品管理

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, HttpClient};
use crate::error::{ApiError, ApiResult, ValidationError};
use crate::protocol::{
    CreateProductRequest, DeleteProductRequest, FeaturedProductsRequest, GetProductRequest,
    ListProductsRequest, UpdateProductRequest,
};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// "Oud · Amber · Musk" -> ["Oud", "Amber", "Musk"]
    pub fn note_list(&self) -> Vec<&str> {
        self.notes
            .split(['·', ',', '|'])
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// 列表接口既可能返回分页对象，也可能直接返回数组
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductListing {
    Page {
        #[serde(default)]
        content: Vec<Product>,
    },
    List(Vec<Product>),
}

impl ProductListing {
    pub fn into_vec(self) -> Vec<Product> {
        match self {
            ProductListing::Page { content } => content,
            ProductListing::List(list) => list,
        }
    }
}

// =========================================================
// 后台表单
// =========================================================

/// 新建 / 编辑商品时提交的完整记录（不含 id）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub notes: String,
    pub size: String,
    pub category_name: String,
    pub featured: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            image_url: String::new(),
            notes: String::new(),
            size: String::new(),
            category_name: String::new(),
            featured: false,
        }
    }
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            notes: product.notes.clone(),
            size: product.size.clone(),
            category_name: product.category_name.clone(),
            featured: product.featured,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.price <= Decimal::ZERO {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

/// 后台表单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormMode::Closed)
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Closed => "",
            FormMode::Create => "Add New Product",
            FormMode::Edit(_) => "Edit Product",
        }
    }
}

/// 后台商品列表的本地缓存 + 表单状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminCatalog {
    pub products: Vec<Product>,
    pub form: FormMode,
    pub draft: ProductDraft,
}

impl AdminCatalog {
    pub fn open_create(&mut self) {
        self.form = FormMode::Create;
        self.draft = ProductDraft::default();
    }

    /// 打开编辑表单，商品不存在时保持原状态
    pub fn open_edit(&mut self, id: i64) -> bool {
        match self.products.iter().find(|p| p.id == id) {
            Some(product) => {
                self.draft = ProductDraft::from_product(product);
                self.form = FormMode::Edit(id);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.form = FormMode::Closed;
        self.draft = ProductDraft::default();
    }

    pub fn featured_count(&self) -> usize {
        self.products.iter().filter(|p| p.featured).count()
    }
}

/// 后台写操作的结果：写入已被后端接受，列表可能没能刷新
#[derive(Debug, Default)]
#[must_use]
pub struct MutationOutcome {
    /// 刷新失败时 `products` 保持写入前的内容
    pub refresh_error: Option<ApiError>,
}

// =========================================================
// API
// =========================================================

impl<H: HttpClient, S: KeyValueStore> ApiClient<H, S> {
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.send(&ListProductsRequest).await?.into_vec())
    }

    pub async fn featured_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.send(&FeaturedProductsRequest).await?.into_vec())
    }

    pub async fn product(&self, id: i64) -> ApiResult<Product> {
        self.send(&GetProductRequest { id }).await
    }

    /// 提交当前表单
    ///
    /// 写入成功即关闭表单并返回 `Ok`；之后的列表刷新失败只记录在
    /// `MutationOutcome` 里，不能让调用方误以为写入没有发生而重复提交。
    pub async fn save_product(&self, catalog: &mut AdminCatalog) -> ApiResult<MutationOutcome> {
        catalog.draft.validate()?;
        match catalog.form {
            FormMode::Closed => return Ok(MutationOutcome::default()),
            FormMode::Create => {
                self.send(&CreateProductRequest {
                    draft: catalog.draft.clone(),
                })
                .await?
            }
            FormMode::Edit(id) => {
                self.send(&UpdateProductRequest {
                    id,
                    draft: catalog.draft.clone(),
                })
                .await?
            }
        }
        catalog.close();
        Ok(self.refresh_products(catalog).await)
    }

    pub async fn delete_product(
        &self,
        catalog: &mut AdminCatalog,
        id: i64,
    ) -> ApiResult<MutationOutcome> {
        self.send(&DeleteProductRequest { id }).await?;
        if catalog.form == FormMode::Edit(id) {
            catalog.close();
        }
        Ok(self.refresh_products(catalog).await)
    }

    async fn refresh_products(&self, catalog: &mut AdminCatalog) -> MutationOutcome {
        match self.list_products().await {
            Ok(list) => {
                catalog.products = list;
                MutationOutcome::default()
            }
            Err(e) => {
                log::warn!("product list refresh failed: {}", e);
                MutationOutcome {
                    refresh_error: Some(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockHttpClient;
    use crate::config::AppConfig;
    use crate::storage::MemoryStore;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn product_json(id: i64, name: &str, featured: bool) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": "A bold fragrance",
            "price": 295,
            "imageUrl": "/images/perfume-noir-absolu.jpg",
            "notes": "Oud · Amber · Musk",
            "size": "100ml Eau de Parfum",
            "categoryName": "Oriental",
            "featured": featured
        })
    }

    #[test]
    fn test_listing_accepts_page_and_array() {
        let page: ProductListing =
            serde_json::from_value(json!({ "content": [product_json(1, "Noir Absolu", true)] }))
                .unwrap();
        let list: ProductListing =
            serde_json::from_value(json!([product_json(1, "Noir Absolu", true)])).unwrap();
        assert_eq!(page.into_vec(), list.into_vec());
    }

    #[test]
    fn test_note_list() {
        let product: Product = serde_json::from_value(product_json(1, "Noir Absolu", true)).unwrap();
        assert_eq!(product.note_list(), vec!["Oud", "Amber", "Musk"]);
        assert_eq!(product.price, dec!(295));
    }

    #[test]
    fn test_form_modes() {
        let mut catalog = AdminCatalog {
            products: vec![serde_json::from_value(product_json(7, "Velvet Soir", false)).unwrap()],
            ..Default::default()
        };

        catalog.open_create();
        assert_eq!(catalog.form, FormMode::Create);
        assert!(catalog.draft.name.is_empty());

        assert!(catalog.open_edit(7));
        assert_eq!(catalog.form, FormMode::Edit(7));
        assert_eq!(catalog.draft.name, "Velvet Soir");

        assert!(!catalog.open_edit(99));
        assert_eq!(catalog.form, FormMode::Edit(7));

        catalog.close();
        assert!(!catalog.form.is_open());
    }

    #[tokio::test]
    async fn test_create_refreshes_list() {
        let http = MockHttpClient::new();
        http.mock_response("POST http://localhost:8080/api/admin/perfumes", 201, json!({}));
        http.mock_response(
            "GET http://localhost:8080/api/perfumes",
            200,
            json!({ "content": [product_json(1, "Noir Absolu", true), product_json(2, "Rose Éternelle", false)] }),
        );
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let mut catalog = AdminCatalog::default();
        catalog.open_create();
        catalog.draft.name = "Rose Éternelle".to_string();
        catalog.draft.price = dec!(245);

        let outcome = client.save_product(&mut catalog).await.unwrap();

        assert!(outcome.refresh_error.is_none());
        assert_eq!(catalog.form, FormMode::Closed);
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.featured_count(), 1);

        let requests = http.requests.borrow();
        assert_eq!(requests[0].method, "POST");
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Rose Éternelle");
        assert!(body.get("id").is_none());
        assert_eq!(requests[1].url, "http://localhost:8080/api/perfumes");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_locally() {
        let http = MockHttpClient::new();
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let mut catalog = AdminCatalog::default();
        catalog.open_create();
        let err = client.save_product(&mut catalog).await.unwrap_err();

        assert_eq!(err.kind, crate::error::ApiErrorKind::Validation);
        assert!(http.requests.borrow().is_empty());
        assert!(catalog.form.is_open());
    }

    #[tokio::test]
    async fn test_update_and_delete_target_ids() {
        let http = MockHttpClient::new();
        http.mock_response("PUT http://localhost:8080/api/admin/perfumes/7", 200, json!({}));
        http.mock_response("DELETE http://localhost:8080/api/admin/perfumes/7", 204, json!(null));
        http.mock_response(
            "GET http://localhost:8080/api/perfumes",
            200,
            json!([product_json(7, "Velvet Soir II", false)]),
        );
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let mut catalog = AdminCatalog {
            products: vec![serde_json::from_value(product_json(7, "Velvet Soir", false)).unwrap()],
            ..Default::default()
        };
        catalog.open_edit(7);
        catalog.draft.name = "Velvet Soir II".to_string();
        let _ = client.save_product(&mut catalog).await.unwrap();
        assert_eq!(catalog.products[0].name, "Velvet Soir II");

        catalog.open_edit(7);
        let _ = client.delete_product(&mut catalog, 7).await.unwrap();
        assert_eq!(catalog.form, FormMode::Closed);

        let methods: Vec<String> = http
            .requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect();
        assert_eq!(
            methods,
            vec![
                "PUT http://localhost:8080/api/admin/perfumes/7",
                "GET http://localhost:8080/api/perfumes",
                "DELETE http://localhost:8080/api/admin/perfumes/7",
                "GET http://localhost:8080/api/perfumes",
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_after_create_closes_form() {
        let http = MockHttpClient::new();
        http.mock_response("POST http://localhost:8080/api/admin/perfumes", 201, json!({}));
        http.mock_response("GET http://localhost:8080/api/perfumes", 500, json!({}));
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let existing: Product = serde_json::from_value(product_json(1, "Noir Absolu", true)).unwrap();
        let mut catalog = AdminCatalog {
            products: vec![existing.clone()],
            ..Default::default()
        };
        catalog.open_create();
        catalog.draft.name = "Rose Éternelle".to_string();
        catalog.draft.price = dec!(245);

        let outcome = client.save_product(&mut catalog).await.unwrap();
        assert!(outcome.refresh_error.is_some());
        assert_eq!(catalog.form, FormMode::Closed);
        assert_eq!(catalog.products, vec![existing]);

        // 表单已关闭，再次提交不会重复创建
        let again = client.save_product(&mut catalog).await;
        assert!(matches!(again, Ok(ref o) if o.refresh_error.is_none()));
        assert_eq!(
            http.request_keys(),
            vec![
                "POST http://localhost:8080/api/admin/perfumes",
                "GET http://localhost:8080/api/perfumes",
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_after_delete_still_succeeds() {
        let http = MockHttpClient::new();
        http.mock_response("DELETE http://localhost:8080/api/admin/perfumes/7", 204, json!(null));
        http.mock_response("GET http://localhost:8080/api/perfumes", 503, json!({}));
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let mut catalog = AdminCatalog {
            products: vec![serde_json::from_value(product_json(7, "Velvet Soir", false)).unwrap()],
            ..Default::default()
        };
        catalog.open_edit(7);

        let outcome = client.delete_product(&mut catalog, 7).await.unwrap();
        assert!(outcome.refresh_error.is_some());
        assert_eq!(catalog.form, FormMode::Closed);
        assert_eq!(http.request_keys().len(), 2);
    }

    #[test]
    fn test_draft_rejects_non_positive_price() {
        let mut draft = ProductDraft {
            name: "Noir Absolu".to_string(),
            price: dec!(0.01),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());

        draft.price = Decimal::ZERO;
        assert_eq!(draft.validate(), Err(ValidationError::MissingFields));
        draft.price = dec!(-5);
        assert!(draft.validate().is_err());
    }
}
