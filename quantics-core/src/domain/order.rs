//! Order lifecycle state machine.
//!
//! `Created → Submitted → Accepted → Completed` on the happy path;
//! `Margin` / `Rejected` / `Canceled` are terminal failures. Transitions are
//! synchronous functions — the engine loop consumes the returned status
//! directly instead of subscribing to broker callbacks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Built from a strategy signal, not yet handed to the broker.
    Created,
    /// Handed to the broker, awaiting the pre-trade checks.
    Submitted,
    /// Passed the pre-trade checks, eligible to fill.
    Accepted,
    /// Filled in full at the bar close.
    Completed,
    /// Withdrawn before any fill.
    Canceled,
    /// Sell size exceeded the held position.
    Rejected,
    /// Buy cost (notional plus commission) exceeded available cash.
    Margin,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Canceled
                | OrderStatus::Rejected
                | OrderStatus::Margin
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Created => "Created",
            OrderStatus::Submitted => "Submitted",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Completed => "Completed",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::Margin => "Margin",
        };
        f.write_str(s)
    }
}

/// A single order with full lifecycle tracking.
///
/// At most one order is outstanding per strategy instance; it reaches a
/// terminal state on the same bar it was created (same-bar settlement at
/// the bar close).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub side: OrderSide,
    pub size: u64,
    pub status: OrderStatus,
    /// Bar index at which the order was created.
    pub created_bar: usize,
    pub created_date: NaiveDate,
    /// Fill price, set only when the order completes.
    pub fill_price: Option<f64>,
    /// Commission charged on the fill, set only when the order completes.
    pub commission: Option<f64>,
}

impl Order {
    pub fn new(side: OrderSide, size: u64, created_bar: usize, created_date: NaiveDate) -> Self {
        Self {
            side,
            size,
            status: OrderStatus::Created,
            created_bar,
            created_date,
            fill_price: None,
            commission: None,
        }
    }

    pub fn submit(&mut self) {
        debug_assert_eq!(self.status, OrderStatus::Created);
        self.status = OrderStatus::Submitted;
    }

    pub fn accept(&mut self) {
        debug_assert_eq!(self.status, OrderStatus::Submitted);
        self.status = OrderStatus::Accepted;
    }

    pub fn complete(&mut self, fill_price: f64, commission: f64) {
        debug_assert_eq!(self.status, OrderStatus::Accepted);
        self.status = OrderStatus::Completed;
        self.fill_price = Some(fill_price);
        self.commission = Some(commission);
    }

    pub fn reject(&mut self) {
        debug_assert!(!self.status.is_terminal());
        self.status = OrderStatus::Rejected;
    }

    pub fn margin(&mut self) {
        debug_assert!(!self.status.is_terminal());
        self.status = OrderStatus::Margin;
    }

    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            self.status = OrderStatus::Canceled;
        }
    }
}
