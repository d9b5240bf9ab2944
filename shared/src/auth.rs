//! 认证流程
//!
//! 登录 / 注册 / OAuth 回调都以一个 Bearer token 结束：token 被持久化，
//! 用户信息从 token payload 解码。找回密码走 OTP 两步流程。

use crate::client::{ApiClient, HttpClient};
use crate::error::{ApiError, ApiErrorKind, ApiResult, ValidationError};
use crate::protocol::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
use crate::session::{AuthProvider, Session};
use crate::storage::KeyValueStore;

#[cfg(test)]
mod tests;

pub const OTP_LENGTH: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 6;
/// 后端发送 OTP 成功时返回的固定文本
pub const OTP_SENT: &str = "OTP sent successfully";
pub const INVALID_OTP: &str = "Invalid OTP. Please try again.";
pub const OAUTH_FAILED: &str = "Authentication failed. Please try again.";

/// 粗略的邮箱格式检查，最终以后端为准
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

// =========================================================
// 表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// 六格 OTP 输入框
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    digits: [Option<char>; OTP_LENGTH],
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digit(&self, index: usize) -> Option<char> {
        self.digits.get(index).copied().flatten()
    }

    /// 输入单格内容，返回应当获得焦点的格子
    ///
    /// 非数字输入被忽略；输入数字后焦点右移，清空后焦点左移。
    pub fn input(&mut self, index: usize, value: &str) -> Option<usize> {
        if index >= OTP_LENGTH {
            return None;
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                self.digits[index] = None;
                index.checked_sub(1)
            }
            (Some(c), None) if c.is_ascii_digit() => {
                self.digits[index] = Some(c);
                (index + 1 < OTP_LENGTH).then_some(index + 1)
            }
            (Some(_), Some(_)) if value.chars().all(|c| c.is_ascii_digit()) => {
                Some(self.paste_at(index, value))
            }
            _ => None,
        }
    }

    /// 空格子上按退格时焦点左移
    pub fn backspace(&self, index: usize) -> Option<usize> {
        if index > 0 && self.digit(index).is_none() {
            Some(index - 1)
        } else {
            None
        }
    }

    pub fn move_left(index: usize) -> Option<usize> {
        index.checked_sub(1)
    }

    pub fn move_right(index: usize) -> Option<usize> {
        (index + 1 < OTP_LENGTH).then_some(index + 1)
    }

    /// 粘贴整段验证码，返回最后填写位置的下一格（或末格）
    pub fn paste(&mut self, text: &str) -> usize {
        self.paste_at(0, text)
    }

    fn paste_at(&mut self, start: usize, text: &str) -> usize {
        let mut index = start;
        for c in text.chars().filter(char::is_ascii_digit) {
            if index >= OTP_LENGTH {
                break;
            }
            self.digits[index] = Some(c);
            index += 1;
        }
        index.min(OTP_LENGTH - 1)
    }

    pub fn code(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.digits = [None; OTP_LENGTH];
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub email: String,
    pub otp: OtpInput,
    pub password: String,
    pub confirm: String,
}

impl ResetPasswordForm {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// 校验顺序: OTP 完整 -> 两次密码一致 -> 长度
    pub fn validate(&self) -> Result<ResetPasswordRequest, ValidationError> {
        let otp = self.otp.code();
        if otp.chars().count() != OTP_LENGTH {
            return Err(ValidationError::IncompleteOtp);
        }
        if self.password != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(ResetPasswordRequest {
            email: self.email.trim().to_string(),
            otp,
            password: self.password.clone(),
        })
    }
}

/// 重发 OTP 的倒计时
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendCountdown {
    remaining: u32,
}

impl ResendCountdown {
    pub fn start(secs: u32) -> Self {
        Self { remaining: secs }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn can_resend(&self) -> bool {
        self.remaining == 0
    }

    /// 每秒调用一次；返回是否仍在倒计时
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}

// =========================================================
// API
// =========================================================

impl<H: HttpClient, S: KeyValueStore> ApiClient<H, S> {
    pub async fn login(&self, form: &LoginForm) -> ApiResult<Session> {
        form.validate()?;
        let resp = self
            .send(&LoginRequest {
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            })
            .await
            .map_err(|e| match e.kind {
                ApiErrorKind::Unauthorized | ApiErrorKind::Rejected => {
                    ApiError::invalid_credentials().in_op("auth.login")
                }
                _ => e.in_op("auth.login"),
            })?;
        self.establish_session(resp.token, "auth.login")
    }

    pub async fn register(&self, form: &RegisterForm) -> ApiResult<Session> {
        form.validate()?;
        let resp = self
            .send(&SignupRequest {
                name: form.name.trim().to_string(),
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            })
            .await
            .map_err(|e| e.or_message("Registration failed").in_op("auth.register"))?;
        self.establish_session(resp.token, "auth.register")
    }

    /// OAuth 授权入口，调用方负责整页跳转
    pub fn oauth_authorize_url(&self, provider: AuthProvider) -> Option<String> {
        provider
            .oauth_slug()
            .map(|slug| self.config().oauth_authorize_url(slug))
    }

    /// `/auth-success?token=...` 回调
    pub fn accept_oauth_token(&self, token: &str) -> ApiResult<Session> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::rejected(OAUTH_FAILED).in_op("auth.oauth_callback"));
        }
        self.establish_session(token.to_string(), "auth.oauth_callback")
    }

    pub fn logout(&self) {
        Session::clear(self.store());
        log::info!("signed out");
    }

    /// 发送 OTP；只有后端返回固定成功文本才算成功，其余文本原样展示
    pub async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        let text = self
            .send(&ForgotPasswordRequest {
                email: email.trim().to_string(),
            })
            .await
            .map_err(|e| e.in_op("auth.forgot_password"))?;

        if text == OTP_SENT {
            Ok(())
        } else {
            Err(ApiError::rejected(text).in_op("auth.forgot_password"))
        }
    }

    /// 本地校验通过后才发出请求；任何非 2xx 都视为 OTP 无效
    pub async fn reset_password(&self, form: &ResetPasswordForm) -> ApiResult<String> {
        let request = form.validate()?;
        self.send(&request).await.map_err(|e| match e.kind {
            ApiErrorKind::Network | ApiErrorKind::Decode => e.in_op("auth.reset_password"),
            _ => ApiError::rejected(INVALID_OTP).in_op("auth.reset_password"),
        })
    }

    fn establish_session(&self, token: String, op: &str) -> ApiResult<Session> {
        let session = Session::from_token(token).map_err(|e| {
            ApiError::decode(OAUTH_FAILED)
                .with_source(e)
                .in_op(op.to_string())
        })?;
        if !session.persist(self.store()) {
            log::warn!("token could not be persisted; session lasts for this page only");
        }
        log::info!("signed in as {}", session.user.email);
        Ok(session)
    }
}
