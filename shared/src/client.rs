//! HTTP 抽象与 REST 客户端
//!
//! `HttpClient` 只负责把请求送出去并带回状态码和文本；
//! 认证头、401 处理、错误映射与响应解析都在 `ApiClient::send` 中完成。

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::HEADER_AUTHORIZATION;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, HttpMethod};
use crate::session::Session;
use crate::storage::KeyValueStore;
use crate::STORAGE_TOKEN_KEY;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
mod tests;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 请求未得到任何 HTTP 响应
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器 fetch 返回的 future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// ApiClient
// =========================================================

type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// 强类型 REST 客户端
///
/// - http: 传输实现（浏览器 fetch / 测试 mock）
/// - store: token 所在的键值存储
/// - on_unauthorized: 认证请求收到 401 时调用（清除会话后）
#[derive(Clone)]
pub struct ApiClient<H, S> {
    http: H,
    store: S,
    config: Arc<AppConfig>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl<H: HttpClient, S: KeyValueStore> ApiClient<H, S> {
    pub fn new(http: H, store: S, config: AppConfig) -> Self {
        Self {
            http,
            store,
            config: Arc::new(config),
            on_unauthorized: None,
        }
    }

    pub fn with_unauthorized_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get(STORAGE_TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
    }

    /// 发送一个端点请求并解析响应
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let path = request.path();
        let url = self.config.api_url(&path);
        let method = R::METHOD.as_str();

        let mut http_req = HttpRequest::new(&url, R::METHOD);
        if let Some(body) = request
            .body()
            .map_err(|e| ApiError::from(e).in_op_with("api.encode", path.clone()))?
        {
            http_req = http_req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }
        if R::AUTHENTICATED {
            if let Some(token) = self.token() {
                http_req =
                    http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
            }
        }

        log::debug!("{} {}", method, url);
        let resp = self.http.send(http_req).await.map_err(|e| {
            log::warn!("{} {} failed: {}", method, url, e);
            ApiError::network(e.to_string())
                .with_source(e)
                .in_op_with("api.send", path.clone())
        })?;

        if !resp.ok() {
            log::warn!("{} {} -> {}", method, url, resp.status);
            if resp.status == 401 && R::AUTHENTICATED {
                self.invalidate_session();
                return Err(ApiError::unauthorized().in_op_with("api.send", path));
            }
            return Err(ApiError::from_status(resp.status, &resp.body).in_op_with("api.send", path));
        }

        R::parse(&resp.body).map_err(|e| ApiError::from(e).in_op_with("api.parse", path))
    }

    /// 访问第三方 JSON 接口（不带认证头，不触发会话失效）
    pub async fn get_external_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let req = HttpRequest::new(url, HttpMethod::Get).with_header("Accept", "application/json");
        let resp = self.http.send(req).await.map_err(|e| {
            ApiError::network(e.to_string())
                .with_source(e)
                .in_op_with("api.external", url)
        })?;
        if !resp.ok() {
            return Err(ApiError::from_status(resp.status, &resp.body).in_op_with("api.external", url));
        }
        serde_json::from_str(&resp.body)
            .map_err(|e| ApiError::from(e).in_op_with("api.external", url))
    }

    /// 清除持久化 token 并通知上层
    pub fn invalidate_session(&self) {
        Session::clear(&self.store);
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}
