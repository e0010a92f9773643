//! Inbound trading alert.
//!
//! An `Alert` is the validated form of one webhook payload. It lives for
//! a single pipeline invocation and is consumed when the order record is
//! built.

use serde::{Deserialize, Serialize};

use crate::decimal::{Price, Quantity};
use crate::error::{CoreError, Result};
use crate::order::{OrderSide, OrderType};

/// Normalize a symbol into the exchange pair form.
///
/// Alerts arrive as `BTC_USDT`, `btc/usdt` or similar; the exchange REST
/// API wants `BTC_USDT`.
pub fn normalize_symbol(s: &str) -> String {
    s.trim().replace('/', "_").to_ascii_uppercase()
}

/// One inbound trading instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Exchange pair, e.g. `BTC_USDT`.
    pub symbol: String,
    pub action: OrderSide,
    pub quantity: Quantity,
    pub order_type: OrderType,
    /// Required when `order_type` is limit.
    pub price: Option<Price>,
    /// Caller-supplied idempotency id, passed through to the exchange.
    pub client_id: Option<String>,
}

impl Alert {
    /// Build a market-order alert.
    pub fn market(symbol: &str, action: OrderSide, quantity: Quantity) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            action,
            quantity,
            order_type: OrderType::Market,
            price: None,
            client_id: None,
        }
    }

    /// Build a limit-order alert.
    pub fn limit(symbol: &str, action: OrderSide, quantity: Quantity, price: Price) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            action,
            quantity,
            order_type: OrderType::Limit,
            price: Some(price),
            client_id: None,
        }
    }

    /// Check the alert invariants.
    ///
    /// - symbol non-empty
    /// - quantity > 0
    /// - price present and > 0 iff the order type is limit
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::EmptySymbol);
        }
        if !self.quantity.is_positive() {
            return Err(CoreError::NonPositiveQuantity(self.quantity.to_string()));
        }
        match (self.order_type, self.price) {
            (OrderType::Limit, None) => Err(CoreError::MissingLimitPrice),
            (_, Some(p)) if !p.is_positive() => Err(CoreError::NonPositivePrice(p.to_string())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("btc/usdt"), "BTC_USDT");
        assert_eq!(normalize_symbol("BTC_USDT"), "BTC_USDT");
        assert_eq!(normalize_symbol(" eth_usdt "), "ETH_USDT");
    }

    #[test]
    fn test_market_alert_valid_without_price() {
        let alert = Alert::market("BTC_USDT", OrderSide::Buy, Quantity::new(dec!(0.001)));
        assert!(alert.validate().is_ok());
    }

    #[test]
    fn test_limit_alert_requires_price() {
        let mut alert = Alert::limit(
            "BTC_USDT",
            OrderSide::Sell,
            Quantity::new(dec!(0.5)),
            Price::new(dec!(65000)),
        );
        assert!(alert.validate().is_ok());

        alert.price = None;
        assert_eq!(alert.validate(), Err(CoreError::MissingLimitPrice));
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let alert = Alert::market("BTC_USDT", OrderSide::Buy, Quantity::new(dec!(-1)));
        assert!(matches!(
            alert.validate(),
            Err(CoreError::NonPositiveQuantity(_))
        ));

        let alert = Alert::market("BTC_USDT", OrderSide::Buy, Quantity::ZERO);
        assert!(alert.validate().is_err());
    }

    #[test]
    fn test_zero_limit_price_rejected() {
        let alert = Alert::limit(
            "BTC_USDT",
            OrderSide::Buy,
            Quantity::new(dec!(1)),
            Price::ZERO,
        );
        assert!(matches!(
            alert.validate(),
            Err(CoreError::NonPositivePrice(_))
        ));
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let alert = Alert::market("  ", OrderSide::Buy, Quantity::new(dec!(1)));
        assert_eq!(alert.validate(), Err(CoreError::EmptySymbol));
    }
}
