//! Order-related enums and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire representation used by the exchange REST API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    /// Parses the webhook `action` field. Case-insensitive ("BUY", "buy").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(CoreError::InvalidAction(other.to_string())),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Market order (default for webhook alerts).
    #[default]
    Market,
    /// Limit order. Requires a price on the alert.
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(Self::Market),
            "limit" => Ok(Self::Limit),
            other => Err(CoreError::InvalidOrderType(other.to_string())),
        }
    }
}

/// Final classification of one order attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Executed quantity equals requested quantity.
    Filled,
    /// Executed quantity is nonzero but below requested quantity.
    Partial,
    /// Nothing executed within the poll bound; order may still be live.
    Open,
    /// Validation failed or submission retries were exhausted.
    Failed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filled => write!(f, "FILLED"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Open => write!(f, "OPEN"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Client order ID for idempotency.
///
/// Attached to every submission so retries of the same attempt cannot
/// create duplicate orders on the exchange. Gate.io text ids must start
/// with `t-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    /// Create a new unique client order ID.
    ///
    /// Format: `t-{timestamp_ms}_{uuid_short}`
    pub fn new() -> Self {
        let ts = chrono::Utc::now().timestamp_millis();
        let uuid_short = &Uuid::new_v4().to_string()[..8];
        Self(format!("t-{ts}_{uuid_short}"))
    }

    /// Create from a caller-supplied id (webhook `client_id` field).
    pub fn from_string(s: String) -> Self {
        if s.starts_with("t-") {
            Self(s)
        } else {
            Self(format!("t-{s}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClientOrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClientOrderId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl AsRef<str> for ClientOrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse_case_insensitive() {
        assert_eq!("BUY".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!(" sell ".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("hold".parse::<OrderSide>().is_err());
    }

    #[test]
    fn test_order_type_parse() {
        assert_eq!("market".parse::<OrderType>().unwrap(), OrderType::Market);
        assert_eq!("LIMIT".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert!("stop".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let s = serde_json::to_string(&OrderStatus::Partial).unwrap();
        assert_eq!(s, "\"PARTIAL\"");
    }

    #[test]
    fn test_client_order_id_unique() {
        let id1 = ClientOrderId::new();
        let id2 = ClientOrderId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_client_order_id_prefix() {
        assert!(ClientOrderId::new().as_str().starts_with("t-"));
        assert_eq!(
            ClientOrderId::from_string("tv_123".to_string()).as_str(),
            "t-tv_123"
        );
        assert_eq!(
            ClientOrderId::from_string("t-abc".to_string()).as_str(),
            "t-abc"
        );
    }
}
