//! 订单历史与详情
//!
//! 订单完全由后端拥有，客户端只读。取消操作在本地按状态白名单把关，
//! 并在后端确认状态变为 CANCELLED 之后才算成功。

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::{ApiClient, HttpClient};
use crate::date;
use crate::error::{ApiError, ApiResult, ValidationError};
use crate::protocol::{CancelOrderRequest, ExportOrdersRequest, GetOrderRequest, MyOrdersRequest};
use crate::storage::KeyValueStore;

// =========================================================
// 状态
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Placed,
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// 后端新增的未知状态，按 PLACED 的样式展示
    Unknown(String),
}

/// 状态徽章的色调
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Accent,
    Info,
    Transit,
    Success,
    Danger,
}

impl StatusTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusTone::Accent => "status-accent",
            StatusTone::Info => "status-info",
            StatusTone::Transit => "status-transit",
            StatusTone::Success => "status-success",
            StatusTone::Danger => "status-danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub description: &'static str,
    pub tone: StatusTone,
}

impl OrderStatus {
    /// 大小写不敏感；空串视为 PLACED
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "PLACED" => OrderStatus::Placed,
            "PENDING" => OrderStatus::Pending,
            "PROCESSING" => OrderStatus::Processing,
            "SHIPPED" => OrderStatus::Shipped,
            "DELIVERED" => OrderStatus::Delivered,
            "CANCELLED" | "CANCELED" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Placed | OrderStatus::Pending | OrderStatus::Processing
        )
    }

    pub fn is_cancelled(&self) -> bool {
        *self == OrderStatus::Cancelled
    }

    pub fn display(&self) -> StatusDisplay {
        match self {
            OrderStatus::Placed | OrderStatus::Unknown(_) => StatusDisplay {
                label: "Order Placed",
                description: "Your order has been confirmed",
                tone: StatusTone::Accent,
            },
            OrderStatus::Pending => StatusDisplay {
                label: "Processing",
                description: "Preparing your luxury items",
                tone: StatusTone::Accent,
            },
            OrderStatus::Processing => StatusDisplay {
                label: "Processing",
                description: "Items being prepared with care",
                tone: StatusTone::Info,
            },
            OrderStatus::Shipped => StatusDisplay {
                label: "Shipped",
                description: "Your package is on its way",
                tone: StatusTone::Transit,
            },
            OrderStatus::Delivered => StatusDisplay {
                label: "Delivered",
                description: "Enjoy your luxury items",
                tone: StatusTone::Success,
            },
            OrderStatus::Cancelled => StatusDisplay {
                label: "Cancelled",
                description: "Order has been cancelled",
                tone: StatusTone::Danger,
            },
        }
    }

    /// 进度时间线: (标签, 是否完成)
    pub fn timeline(&self) -> [(&'static str, bool); 4] {
        let past_placed = !matches!(self, OrderStatus::Placed | OrderStatus::Unknown(_));
        let shipped = matches!(self, OrderStatus::Shipped | OrderStatus::Delivered);
        let delivered = *self == OrderStatus::Delivered;
        [
            ("Order Placed", true),
            ("Processing", past_placed),
            ("Shipped", shipped),
            ("Delivered", delivered),
        ]
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| OrderStatus::parse(&s)).unwrap_or_default())
    }
}

// =========================================================
// 订单
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfumeRef {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub quantity: u32,
    pub price: Decimal,
    pub perfume: PerfumeRef,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// `#000042`
    pub fn reference(&self) -> String {
        format!("#{:06}", self.id)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    pub fn formatted_date(&self) -> String {
        date::display_date(&self.created_at)
    }

    pub fn formatted_time(&self) -> Option<String> {
        date::parse_backend_datetime(&self.created_at).map(|dt| date::format_time(&dt))
    }

    pub fn payment_label(&self) -> &str {
        match self.payment_method.to_ascii_lowercase().as_str() {
            "cash" => "Cash on Delivery",
            "online" => "Online Payment",
            _ => &self.payment_method,
        }
    }
}

/// 订单列表页顶部的汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderSummary {
    pub count: usize,
    pub total_spent: Decimal,
    pub delivered: usize,
}

impl OrderSummary {
    pub fn of(orders: &[Order]) -> Self {
        Self {
            count: orders.len(),
            total_spent: orders.iter().map(|o| o.total_amount).sum(),
            delivered: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Delivered)
                .count(),
        }
    }
}

// =========================================================
// API
// =========================================================

impl<H: HttpClient, S: KeyValueStore> ApiClient<H, S> {
    pub async fn fetch_my_orders(&self) -> ApiResult<Vec<Order>> {
        self.send(&MyOrdersRequest).await
    }

    pub async fn fetch_order(&self, id: i64) -> ApiResult<Order> {
        self.send(&GetOrderRequest { id })
            .await
            .map_err(|e| e.in_op_with("orders.fetch", id.to_string()))
    }

    /// 导出的 CSV 原文
    pub async fn export_orders(&self) -> ApiResult<String> {
        self.send(&ExportOrdersRequest).await
    }

    /// 取消订单并确认生效
    ///
    /// 本地先按状态白名单拒绝；后端接受后重新拉取订单，
    /// 只有状态确实变为 CANCELLED 才返回成功。
    pub async fn cancel_order_confirmed(&self, order: &Order) -> ApiResult<Order> {
        if !order.can_cancel() {
            return Err(ApiError::from(ValidationError::NotCancellable)
                .in_op_with("orders.cancel", order.id.to_string()));
        }

        self.send(&CancelOrderRequest { id: order.id })
            .await
            .map_err(|e| e.in_op_with("orders.cancel", order.id.to_string()))?;

        let refreshed = self.fetch_order(order.id).await?;
        if !refreshed.status.is_cancelled() {
            log::warn!(
                "order {} still {} after cancel request",
                order.id,
                refreshed.status
            );
            return Err(ApiError::rejected("Failed to cancel order. Please try again.")
                .in_op_with("orders.cancel", order.id.to_string()));
        }

        log::info!("order {} cancelled", order.id);
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockHttpClient;
    use crate::config::AppConfig;
    use crate::error::ApiErrorKind;
    use crate::storage::MemoryStore;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn order_json(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "totalAmount": 785,
            "status": status,
            "createdAt": "2025-01-05T10:20:30",
            "paymentMethod": "cash",
            "items": [
                { "id": 1, "quantity": 1, "price": 295, "perfume": { "name": "Noir Absolu", "imageUrl": "/images/perfume-noir-absolu.jpg" } },
                { "id": 2, "quantity": 2, "price": 245, "perfume": { "name": "Rose Éternelle" } }
            ]
        })
    }

    fn order(id: i64, status: &str) -> Order {
        serde_json::from_value(order_json(id, status)).unwrap()
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("shipped"), OrderStatus::Shipped);
        assert_eq!(OrderStatus::parse(" Cancelled "), OrderStatus::Cancelled);
        assert_eq!(
            OrderStatus::parse("ON_HOLD"),
            OrderStatus::Unknown("ON_HOLD".to_string())
        );
    }

    #[test]
    fn test_cancel_whitelist() {
        for s in ["PLACED", "pending", "PROCESSING"] {
            assert!(OrderStatus::parse(s).can_cancel(), "{}", s);
        }
        for s in ["SHIPPED", "DELIVERED", "CANCELLED", "ON_HOLD"] {
            assert!(!OrderStatus::parse(s).can_cancel(), "{}", s);
        }
    }

    #[test]
    fn test_unknown_status_falls_back_to_placed_display() {
        let unknown = OrderStatus::parse("REFUND_REQUESTED").display();
        assert_eq!(unknown, OrderStatus::Placed.display());

        let missing: Order = serde_json::from_value(json!({ "id": 3, "totalAmount": 10, "status": null })).unwrap();
        assert_eq!(missing.status, OrderStatus::Placed);
    }

    #[test]
    fn test_order_helpers() {
        let order = order(42, "DELIVERED");
        assert_eq!(order.reference(), "#000042");
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.items[1].line_total(), dec!(490));
        assert_eq!(order.formatted_date(), "January 5, 2025");
        assert_eq!(order.payment_label(), "Cash on Delivery");
        assert_eq!(order.status.timeline().iter().filter(|(_, done)| *done).count(), 4);

        let summary = OrderSummary::of(&[order, self::order(43, "PLACED")]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_spent, dec!(1570));
        assert_eq!(summary.delivered, 1);
    }

    #[tokio::test]
    async fn test_cancel_waits_for_confirmed_status() {
        let http = MockHttpClient::new();
        http.mock_response("PATCH http://localhost:8080/api/orders/42/cancel", 200, json!({}));
        http.mock_response("GET http://localhost:8080/api/orders/42", 200, order_json(42, "CANCELLED"));
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let refreshed = client.cancel_order_confirmed(&order(42, "PLACED")).await.unwrap();

        assert!(refreshed.status.is_cancelled());
        assert_eq!(
            http.request_keys(),
            vec![
                "PATCH http://localhost:8080/api/orders/42/cancel",
                "GET http://localhost:8080/api/orders/42",
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_fails_when_refetch_disagrees() {
        let http = MockHttpClient::new();
        http.mock_response("PATCH http://localhost:8080/api/orders/42/cancel", 200, json!({}));
        http.mock_response("GET http://localhost:8080/api/orders/42", 200, order_json(42, "PROCESSING"));
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let err = client.cancel_order_confirmed(&order(42, "PROCESSING")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Rejected);
    }

    #[tokio::test]
    async fn test_cancel_refused_locally_for_shipped() {
        let http = MockHttpClient::new();
        let client = ApiClient::new(http.clone(), MemoryStore::new(), AppConfig::default());

        let err = client.cancel_order_confirmed(&order(42, "SHIPPED")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert!(http.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_export_returns_raw_text() {
        let http = MockHttpClient::new();
        http.mock_text("GET http://localhost:8080/api/orders/export", 200, "id,total\n42,785\n");
        let client = ApiClient::new(http, MemoryStore::new(), AppConfig::default());

        let csv = client.export_orders().await.unwrap();
        assert!(csv.starts_with("id,total"));
    }
}
