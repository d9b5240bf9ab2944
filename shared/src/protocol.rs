//! REST 端点定义
//!
//! 每个请求类型通过 `ApiRequest` 绑定方法、路径、请求体与响应解析方式。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::account::{Address, AddressDraft, Profile};
use crate::catalog::{Product, ProductDraft, ProductListing};
use crate::checkout::{PlaceOrderRequest, PlacedOrder};
use crate::order::Order;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 定义端点的请求-响应关系与元数据
pub trait ApiRequest {
    /// 解析后的响应类型
    type Response;
    const METHOD: HttpMethod;
    /// 是否携带 Bearer token；公开端点上的 401 不会清除会话
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String;

    fn body(&self) -> serde_json::Result<Option<String>> {
        Ok(None)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response>;
}

pub fn json_body<T: Serialize>(value: &T) -> serde_json::Result<Option<String>> {
    serde_json::to_string(value).map(Some)
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    serde_json::from_str(body)
}

/// 纯文本响应（如 "OTP sent successfully"）
pub fn parse_text(body: &str) -> serde_json::Result<String> {
    Ok(body.trim().to_string())
}

/// 忽略响应体
pub fn parse_empty(_body: &str) -> serde_json::Result<()> {
    Ok(())
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthToken {
    #[serde(alias = "accessToken", alias = "jwt")]
    pub token: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthToken;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

impl ApiRequest for SignupRequest {
    type Response = AuthToken;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/signup".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/forgot-password".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_text(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

impl ApiRequest for ResetPasswordRequest {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/reset-password".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_text(body)
    }
}

// =========================================================
// Account
// =========================================================

#[derive(Debug, Clone)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = Profile;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/user/profile".to_string()
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/api/user/profile".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/api/user/password".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_text(body)
    }
}

#[derive(Debug, Clone)]
pub struct ListAddressesRequest;

impl ApiRequest for ListAddressesRequest {
    type Response = Vec<Address>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/address".to_string()
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone)]
pub struct CreateAddressRequest {
    pub draft: AddressDraft,
}

impl ApiRequest for CreateAddressRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/address".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(&self.draft)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateAddressRequest {
    pub address: Address,
}

impl ApiRequest for UpdateAddressRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/address/{}", self.address.id)
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(&self.address)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteAddressRequest {
    pub id: i64,
}

impl ApiRequest for DeleteAddressRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/address/{}", self.id)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

// =========================================================
// Orders
// =========================================================

#[derive(Debug, Clone)]
pub struct MyOrdersRequest;

impl ApiRequest for MyOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/orders/my".to_string()
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone)]
pub struct GetOrderRequest {
    pub id: i64,
}

impl ApiRequest for GetOrderRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/orders/{}", self.id)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone)]
pub struct CancelOrderRequest {
    pub id: i64,
}

impl ApiRequest for CancelOrderRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/api/orders/{}/cancel", self.id)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

#[derive(Debug, Clone)]
pub struct ExportOrdersRequest;

impl ApiRequest for ExportOrdersRequest {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/orders/export".to_string()
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        Ok(body.to_string())
    }
}

impl ApiRequest for PlaceOrderRequest {
    type Response = PlacedOrder;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/orders".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(self)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        // 部分后端在创建成功时返回空 body
        if body.trim().is_empty() {
            return Ok(PlacedOrder::default());
        }
        parse_json(body)
    }
}

// =========================================================
// Catalog
// =========================================================

#[derive(Debug, Clone)]
pub struct ListProductsRequest;

impl ApiRequest for ListProductsRequest {
    type Response = ProductListing;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/perfumes".to_string()
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone)]
pub struct FeaturedProductsRequest;

impl ApiRequest for FeaturedProductsRequest {
    type Response = ProductListing;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/perfumes/featured".to_string()
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone)]
pub struct GetProductRequest {
    pub id: i64,
}

impl ApiRequest for GetProductRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        format!("/api/perfumes/{}", self.id)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_json(body)
    }
}

#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub draft: ProductDraft,
}

impl ApiRequest for CreateProductRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/admin/perfumes".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(&self.draft)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProductRequest {
    pub id: i64,
    pub draft: ProductDraft,
}

impl ApiRequest for UpdateProductRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/admin/perfumes/{}", self.id)
    }

    fn body(&self) -> serde_json::Result<Option<String>> {
        json_body(&self.draft)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteProductRequest {
    pub id: i64,
}

impl ApiRequest for DeleteProductRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/admin/perfumes/{}", self.id)
    }

    fn parse(body: &str) -> serde_json::Result<Self::Response> {
        parse_empty(body)
    }
}
