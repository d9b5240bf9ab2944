//! 定价规则
//!
//! 免运费门槛与运费只在此处定义，购物车页、结算页与订单确认页共用。

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::cart::Cart;

/// 小计达到该值即免运费（含边界）
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(150);
/// 未达门槛时的固定运费
pub const SHIPPING_FEE: Decimal = dec!(15);

pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FEE
    }
}

/// 距离免运费还差多少，已免运费时为 0
pub fn amount_to_free_shipping(subtotal: Decimal) -> Decimal {
    (FREE_SHIPPING_THRESHOLD - subtotal).max(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl PriceSummary {
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let shipping = shipping_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    pub fn for_cart(cart: &Cart) -> Self {
        Self::from_subtotal(cart.total_price())
    }

    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// 展示用价格格式: `$1,234` / `$149.99`
///
/// 整数金额不带小数位，非整数保留两位。
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let whole = abs.trunc().normalize();
    let frac = abs - whole;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac.is_zero() {
        format!("{}${}", sign, grouped)
    } else {
        let cents = (frac * dec!(100)).round();
        format!("{}${}.{:0>2}", sign, grouped, cents.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_boundary() {
        assert_eq!(shipping_for(dec!(150)), Decimal::ZERO);
        assert_eq!(shipping_for(dec!(149.99)), dec!(15));
        assert_eq!(shipping_for(Decimal::ZERO), dec!(15));
        assert_eq!(shipping_for(dec!(785)), Decimal::ZERO);
    }

    #[test]
    fn test_summary_for_small_order() {
        let summary = PriceSummary::from_subtotal(dec!(100));
        assert_eq!(summary.shipping, dec!(15));
        assert_eq!(summary.total, dec!(115));
        assert!(!summary.is_free_shipping());
    }

    #[test]
    fn test_amount_to_free_shipping() {
        assert_eq!(amount_to_free_shipping(dec!(100)), dec!(50));
        assert_eq!(amount_to_free_shipping(dec!(150)), Decimal::ZERO);
        assert_eq!(amount_to_free_shipping(dec!(900)), Decimal::ZERO);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(295)), "$295");
        assert_eq!(format_price(dec!(1234)), "$1,234");
        assert_eq!(format_price(dec!(1234567.5)), "$1,234,567.50");
        assert_eq!(format_price(dec!(149.99)), "$149.99");
        assert_eq!(format_price(Decimal::ZERO), "$0");
    }
}
