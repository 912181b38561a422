//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Status of an order as tracked by the backend.
///
/// Older backend builds report Portuguese names; both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "pendente")]
    Pending,
    #[serde(alias = "pago")]
    Paid,
    #[serde(alias = "processando", alias = "em_preparacao")]
    Processing,
    #[serde(alias = "enviado")]
    Shipped,
    #[serde(alias = "entregue")]
    Delivered,
    #[serde(alias = "cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Paid => "Pago",
            Self::Processing => "Em preparação",
            Self::Shipped => "Enviado",
            Self::Delivered => "Entregue",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Whether no further transitions are expected.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the back-office may move an order from `self` to `next`.
    ///
    /// Orders only move forward through the lifecycle; any non-final order
    /// can be cancelled.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_final() || self == next {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        let position = |status: Self| Self::ALL.iter().position(|s| *s == status);
        matches!((position(self), position(next)), (Some(from), Some(to)) if to > from)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "pendente" => Ok(Self::Pending),
            "paid" | "pago" => Ok(Self::Paid),
            "processing" | "processando" | "em_preparacao" => Ok(Self::Processing),
            "shipped" | "enviado" => Ok(Self::Shipped),
            "delivered" | "entregue" => Ok(Self::Delivered),
            "cancelled" | "canceled" | "cancelado" => Ok(Self::Cancelled),
            other => Err(format!("invalid order status: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_languages() {
        assert_eq!("Pago".parse::<OrderStatus>(), Ok(OrderStatus::Paid));
        assert_eq!("shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert!("lost".parse::<OrderStatus>().is_err());

        let status: OrderStatus = serde_json::from_str("\"cancelado\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn test_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Paid));
    }
}
