use std::fmt;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型枚举
/// 对应前端可见的几类失败语义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 本地表单校验失败（未发出任何网络请求）
    Validation,
    /// 登录凭据错误
    InvalidCredentials,
    /// 401: 会话失效，token 已被清除
    Unauthorized,
    /// 4xx: 后端业务规则拒绝（如当前密码错误），消息原样展示
    Rejected,
    /// 404: 资源未找到
    NotFound,
    /// 网络层失败（无响应）
    Network,
    /// 5xx
    Server,
    /// 请求序列化或响应解析失败
    Decode,
}

impl ApiErrorKind {
    /// 根据 HTTP 状态码推断错误类型
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Rejected,
            _ => ApiErrorKind::Server,
        }
    }

    /// 代表性的 HTTP 状态码，纯客户端错误为 0
    pub fn status_code(&self) -> u16 {
        match self {
            ApiErrorKind::Unauthorized => 401,
            ApiErrorKind::Rejected | ApiErrorKind::InvalidCredentials => 400,
            ApiErrorKind::NotFound => 404,
            ApiErrorKind::Server => 500,
            ApiErrorKind::Validation | ApiErrorKind::Network | ApiErrorKind::Decode => 0,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "VALIDATION",
            ApiErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiErrorKind::Unauthorized => "UNAUTHORIZED",
            ApiErrorKind::Rejected => "REJECTED",
            ApiErrorKind::NotFound => "NOT_FOUND",
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Server => "SERVER_ERROR",
            ApiErrorKind::Decode => "DECODE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.send", "orders.cancel"
    pub operation: String,
    /// 额外的细节信息，如请求路径、订单 id
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

pub const GENERIC_SERVER_ERROR: &str = "Server error. Please try again.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

/// 客户端统一错误
///
/// - kind: 错误语义
/// - message: 原始消息（后端文本或本地校验文案）
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
    /// message 是否为状态码兜底文案（后端未给出 body）
    synthetic: bool,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            spans: Vec::new(),
            synthetic: false,
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ApiErrorKind::InvalidCredentials, INVALID_CREDENTIALS)
    }

    pub fn unauthorized() -> Self {
        Self::new(ApiErrorKind::Unauthorized, SESSION_EXPIRED)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Rejected, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Server, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    /// 由非 2xx 响应构造；空 body 时使用状态码兜底
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            let mut err = Self::new(
                ApiErrorKind::from_status(status),
                format!("Request failed with status {}", status),
            );
            err.synthetic = true;
            return err;
        }
        Self::new(ApiErrorKind::from_status(status), body)
    }

    /// 后端没有给出文案时换成页面自己的提示
    pub fn or_message(mut self, fallback: impl Into<String>) -> Self {
        if self.synthetic {
            self.message = fallback.into();
            self.synthetic = false;
        }
        self
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// 面向用户的提示文案
    ///
    /// 网络、5xx、解析失败不做区分，统一为通用提示。
    pub fn user_message(&self) -> String {
        match self.kind {
            ApiErrorKind::Validation | ApiErrorKind::Rejected | ApiErrorKind::NotFound => {
                self.message.clone()
            }
            ApiErrorKind::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            ApiErrorKind::Unauthorized => SESSION_EXPIRED.to_string(),
            ApiErrorKind::Network | ApiErrorKind::Server | ApiErrorKind::Decode => {
                GENERIC_SERVER_ERROR.to_string()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 本地校验错误
// =========================================================

/// 提交前的本地校验失败，文案直接展示给用户
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill all required fields")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter all 6 digits of the OTP")]
    IncompleteOtp,
    #[error("Cart is empty!")]
    EmptyCart,
    #[error("Please select a payment method")]
    NoPaymentMethod,
    #[error("Your order is already being processed")]
    AlreadyProcessing,
    #[error("This order can no longer be cancelled")]
    NotCancellable,
    #[error("Password is managed by your {0} account")]
    ExternalAccount(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::validation(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string()).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_kinds() {
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(409), ApiErrorKind::Rejected);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::Server);
    }

    #[test]
    fn test_display_includes_trace() {
        let err = ApiError::rejected("Wrong current password")
            .in_op("api.call")
            .in_op_with("account.change_password", "/api/user/password");
        assert_eq!(
            err.to_string(),
            "[REJECTED] Wrong current password | trace: api.call -> account.change_password(/api/user/password)"
        );
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.user_message(), GENERIC_SERVER_ERROR);

        let err = ApiError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.user_message(), GENERIC_SERVER_ERROR);

        let err = ApiError::from_status(400, "Email already registered");
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_empty_body_falls_back_to_status() {
        let err = ApiError::from_status(500, "  ");
        assert_eq!(err.message(), "Request failed with status 500");
    }

    #[test]
    fn test_or_message_only_replaces_status_fallback() {
        let err = ApiError::from_status(400, "").or_message("Wrong current password");
        assert_eq!(err.message(), "Wrong current password");

        let err = ApiError::from_status(400, "Password too weak").or_message("Wrong current password");
        assert_eq!(err.message(), "Password too weak");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: ApiError = ValidationError::IncompleteOtp.into();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.user_message(), "Please enter all 6 digits of the OTP");
    }
}
