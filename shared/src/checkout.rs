//! 结算流程
//!
//! 状态机: `Reviewing -> Processing -> Complete`，失败时回到 `Reviewing`
//! 并携带内联错误。`Processing` 期间拒绝再次提交。

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLineItem};
use crate::client::{ApiClient, HttpClient};
use crate::date::Timestamp;
use crate::error::{ApiResult, ValidationError};
use crate::pricing::PriceSummary;
use crate::storage::KeyValueStore;

pub const ESTIMATED_DELIVERY: &str = "5-7 business days";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Cash,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "Online Payment",
            PaymentMethod::Cash => "Cash on Delivery",
        }
    }
}

// =========================================================
// 下单请求
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub perfume_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderLine>,
}

impl PlaceOrderRequest {
    pub fn from_cart(cart: &Cart, payment_method: PaymentMethod) -> Self {
        Self {
            payment_method,
            items: cart
                .lines()
                .iter()
                .map(|l| OrderLine {
                    perfume_id: l.perfume_id,
                    quantity: l.quantity,
                })
                .collect(),
        }
    }
}

/// 下单响应；后端可能只返回部分字段甚至空 body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    #[serde(default, alias = "orderId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

// =========================================================
// 订单号展示
// =========================================================

/// 确认页展示的订单号
///
/// 有后端 id 时为 `MN-{id}`；否则是仅供展示的临时编号，
/// 不可用于任何后续操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOrderNumber {
    Backend(i64),
    Provisional(String),
}

impl DisplayOrderNumber {
    pub fn for_order(placed: &PlacedOrder, now: Timestamp) -> Self {
        match placed.id {
            Some(id) => DisplayOrderNumber::Backend(id),
            None => Self::provisional(now, &mut rand::thread_rng()),
        }
    }

    /// `MN-` + 毫秒时间戳的 36 进制 + 4 位随机数
    pub fn provisional<R: Rng>(now: Timestamp, rng: &mut R) -> Self {
        let suffix: u32 = rng.gen_range(0..10_000);
        DisplayOrderNumber::Provisional(format!(
            "MN-{}{:04}",
            to_base36(now.as_millis().max(0) as u64),
            suffix
        ))
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, DisplayOrderNumber::Provisional(_))
    }

    pub fn backend_id(&self) -> Option<i64> {
        match self {
            DisplayOrderNumber::Backend(id) => Some(*id),
            DisplayOrderNumber::Provisional(_) => None,
        }
    }
}

impl fmt::Display for DisplayOrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayOrderNumber::Backend(id) => write!(f, "MN-{}", id),
            DisplayOrderNumber::Provisional(s) => f.write_str(s),
        }
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

// =========================================================
// 状态机
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order_number: DisplayOrderNumber,
    pub lines: Vec<CartLineItem>,
    pub summary: PriceSummary,
    pub payment_method: PaymentMethod,
    pub estimated_delivery: &'static str,
}

impl OrderConfirmation {
    /// 只有后端返回的 id 才能用于跳转订单详情
    pub fn order_id(&self) -> Option<i64> {
        self.order_number.backend_id()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckoutPhase {
    #[default]
    Reviewing,
    Processing,
    Complete(Box<OrderConfirmation>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutFlow {
    pub phase: CheckoutPhase,
    pub payment_method: Option<PaymentMethod>,
    pub error: Option<String>,
}

impl CheckoutFlow {
    pub fn is_processing(&self) -> bool {
        self.phase == CheckoutPhase::Processing
    }

    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        match &self.phase {
            CheckoutPhase::Complete(c) => Some(c),
            _ => None,
        }
    }

    /// 处理中不允许切换支付方式
    pub fn select_payment(&mut self, method: PaymentMethod) -> bool {
        if self.is_processing() {
            return false;
        }
        self.payment_method = Some(method);
        self.error = None;
        true
    }

    /// 进入 Processing 并生成下单请求
    pub fn begin(&mut self, cart: &Cart) -> Result<PlaceOrderRequest, ValidationError> {
        if self.is_processing() {
            return Err(ValidationError::AlreadyProcessing);
        }
        let Some(method) = self.payment_method else {
            return Err(ValidationError::NoPaymentMethod);
        };
        if cart.is_empty() {
            self.error = Some(ValidationError::EmptyCart.to_string());
            return Err(ValidationError::EmptyCart);
        }

        self.error = None;
        self.phase = CheckoutPhase::Processing;
        Ok(PlaceOrderRequest::from_cart(cart, method))
    }

    pub fn complete(&mut self, confirmation: OrderConfirmation) {
        self.phase = CheckoutPhase::Complete(Box::new(confirmation));
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = CheckoutPhase::Reviewing;
        self.error = Some(message.into());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =========================================================
// API
// =========================================================

impl<H: HttpClient, S: KeyValueStore> ApiClient<H, S> {
    /// 提交订单；购物车由调用方在成功后清空
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
        cart: &Cart,
        now: Timestamp,
    ) -> ApiResult<OrderConfirmation> {
        let placed = self
            .send(request)
            .await
            .map_err(|e| e.in_op_with("checkout.place_order", format!("{} lines", request.items.len())))?;

        let order_number = DisplayOrderNumber::for_order(&placed, now);
        log::info!("order placed: {}", order_number);

        Ok(OrderConfirmation {
            order_number,
            lines: cart.lines().to_vec(),
            summary: PriceSummary::for_cart(cart),
            payment_method: request.payment_method,
            estimated_delivery: ESTIMATED_DELIVERY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewCartItem;
    use crate::client::mock::MockHttpClient;
    use crate::config::AppConfig;
    use crate::storage::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const ORDERS_URL: &str = "POST http://localhost:8080/api/orders";

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        for (id, perfume_id, price, qty) in [
            ("noir-absolu", 1, dec!(295), 1),
            ("rose-eternelle", 2, dec!(245), 2),
        ] {
            cart.add(
                NewCartItem {
                    id: id.to_string(),
                    perfume_id,
                    name: id.to_string(),
                    price,
                    image: String::new(),
                },
                qty,
            );
        }
        cart
    }

    #[test]
    fn test_request_payload_shape() {
        let request = PlaceOrderRequest::from_cart(&sample_cart(), PaymentMethod::Cash);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "paymentMethod": "cash",
                "items": [
                    { "perfumeId": 1, "quantity": 1 },
                    { "perfumeId": 2, "quantity": 2 }
                ]
            })
        );
    }

    #[test]
    fn test_begin_guards() {
        let mut flow = CheckoutFlow::default();
        assert_eq!(flow.begin(&sample_cart()), Err(ValidationError::NoPaymentMethod));

        flow.select_payment(PaymentMethod::Online);
        assert_eq!(flow.begin(&Cart::new()), Err(ValidationError::EmptyCart));
        assert_eq!(flow.error.as_deref(), Some("Cart is empty!"));
        assert_eq!(flow.phase, CheckoutPhase::Reviewing);

        assert!(flow.begin(&sample_cart()).is_ok());
        assert!(flow.is_processing());
        assert_eq!(flow.begin(&sample_cart()), Err(ValidationError::AlreadyProcessing));
        assert!(!flow.select_payment(PaymentMethod::Cash));
    }

    #[test]
    fn test_fail_returns_to_reviewing() {
        let mut flow = CheckoutFlow::default();
        flow.select_payment(PaymentMethod::Cash);
        flow.begin(&sample_cart()).unwrap();
        flow.fail("Server error. Please try again.");

        assert_eq!(flow.phase, CheckoutPhase::Reviewing);
        assert_eq!(flow.payment_method, Some(PaymentMethod::Cash));
        assert!(flow.error.is_some());
    }

    #[test]
    fn test_display_order_number() {
        let placed = PlacedOrder {
            id: Some(1042),
            status: None,
        };
        let number = DisplayOrderNumber::for_order(&placed, Timestamp::new(0));
        assert_eq!(number.to_string(), "MN-1042");
        assert_eq!(number.backend_id(), Some(1042));

        let mut rng = StdRng::seed_from_u64(7);
        let provisional = DisplayOrderNumber::provisional(Timestamp::new(36 * 36), &mut rng);
        assert!(provisional.is_provisional());
        assert!(provisional.backend_id().is_none());
        let text = provisional.to_string();
        assert!(text.starts_with("MN-100"));
        assert_eq!(text.len(), "MN-100".len() + 4);
    }

    #[tokio::test]
    async fn test_place_order_uses_real_totals() {
        let http = MockHttpClient::new();
        http.mock_response(ORDERS_URL, 201, json!({ "id": 77, "status": "PLACED" }));
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());
        let cart = sample_cart();

        let mut flow = CheckoutFlow::default();
        flow.select_payment(PaymentMethod::Online);
        let request = flow.begin(&cart).unwrap();
        let confirmation = client
            .place_order(&request, &cart, Timestamp::new(1_700_000_000_000))
            .await
            .unwrap();
        flow.complete(confirmation);

        let confirmation = flow.confirmation().unwrap();
        assert_eq!(confirmation.order_id(), Some(77));
        assert_eq!(confirmation.summary.total, dec!(785));
        assert!(confirmation.summary.is_free_shipping());
        assert_eq!(http.requests.borrow()[0].header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_empty_response_body_gets_provisional_number() {
        let http = MockHttpClient::new();
        http.mock_text(ORDERS_URL, 201, "");
        let client = ApiClient::new(http, MemoryStore::new(), AppConfig::default());

        let cart = sample_cart();
        let request = PlaceOrderRequest::from_cart(&cart, PaymentMethod::Cash);
        let confirmation = client
            .place_order(&request, &cart, Timestamp::new(1_700_000_000_000))
            .await
            .unwrap();

        assert!(confirmation.order_number.is_provisional());
        assert!(confirmation.order_id().is_none());
    }

    #[tokio::test]
    async fn test_failed_order_leaves_cart_to_caller() {
        let http = MockHttpClient::new();
        http.mock_text(ORDERS_URL, 500, "boom");
        let client = ApiClient::new(http, MemoryStore::new(), AppConfig::default());

        let cart = sample_cart();
        let mut flow = CheckoutFlow::default();
        flow.select_payment(PaymentMethod::Cash);
        let request = flow.begin(&cart).unwrap();
        let err = client
            .place_order(&request, &cart, Timestamp::new(0))
            .await
            .unwrap_err();
        flow.fail(err.user_message());

        assert_eq!(flow.error.as_deref(), Some("Server error. Please try again."));
        assert_eq!(cart.total_items(), 3);
    }
}
