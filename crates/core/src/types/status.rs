//! Order status values shared between the client and the storefront API.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Serialized in PascalCase to match the storefront API's wire values
/// (a freshly submitted checkout is `"Pending"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Shipping => write!(f, "Shipping"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Shipping" => Ok(Self::Shipping),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_wire_value() {
        let json = serde_json::to_string(&OrderStatus::Pending).expect("serialize");
        assert_eq!(json, "\"Pending\"");
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        let status: OrderStatus = "Shipping".parse().expect("parse");
        assert_eq!(status, OrderStatus::Shipping);
        assert_eq!(status.to_string(), "Shipping");
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
