use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// 被记录下来的请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

enum Canned {
    Response(u16, String),
    Offline,
}

/// 按 "METHOD URL" 返回预设响应的 HTTP 客户端
///
/// 同一个 key 可以排队多个响应，最后一个会一直保留。
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Rc<RefCell<HashMap<String, VecDeque<Canned>>>>,
    pub requests: Rc<RefCell<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, key: &str, status: u16, body: serde_json::Value) {
        self.push(key, Canned::Response(status, body.to_string()));
    }

    pub fn mock_text(&self, key: &str, status: u16, body: &str) {
        self.push(key, Canned::Response(status, body.to_string()));
    }

    /// 模拟网络不可达
    pub fn mock_offline(&self, key: &str) {
        self.push(key, Canned::Offline);
    }

    fn push(&self, key: &str, canned: Canned) {
        self.responses
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push_back(canned);
    }

    pub fn request_keys(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = req.method.as_str().to_string();
        let key = format!("{} {}", method, req.url);
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            url: req.url,
            headers: req.headers,
            body: req.body,
        });

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&key) else {
            return Ok(HttpResponse {
                status: 404,
                body: format!("no mock for {}", key),
            });
        };

        let canned = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|c| match c {
                Canned::Response(status, body) => Canned::Response(*status, body.clone()),
                Canned::Offline => Canned::Offline,
            })
        };

        match canned {
            Some(Canned::Response(status, body)) => Ok(HttpResponse { status, body }),
            Some(Canned::Offline) => Err(TransportError::Network("connection refused".into())),
            None => Ok(HttpResponse {
                status: 404,
                body: format!("no mock for {}", key),
            }),
        }
    }
}
