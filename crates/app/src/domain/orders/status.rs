//! Order status and payment method.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the order may still be cancelled.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        !matches!(self, Self::Shipped | Self::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status `{0}`")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidOrderStatus(other.to_string())),
        }
    }
}

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    CreditCard,
    PayPal,
    CashOnDelivery,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "CreditCard",
            Self::PayPal => "PayPal",
            Self::CashOnDelivery => "CashOnDelivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid payment method `{0}`")]
pub struct InvalidPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = InvalidPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CreditCard" => Ok(Self::CreditCard),
            "PayPal" => Ok(Self::PayPal),
            "CashOnDelivery" | "COD" => Ok(Self::CashOnDelivery),
            other => Err(InvalidPaymentMethod(other.to_string())),
        }
    }
}
