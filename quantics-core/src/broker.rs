//! Broker — cash/position ledger and the order state machine.
//!
//! Submission runs the pre-trade checks and settles accepted orders
//! immediately at the bar close (same-bar settlement, no intrabar
//! slippage). Rejections are not errors: they surface as terminal order
//! statuses and log lines, and the strategy may try again on a later bar.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{Bar, Order, OrderSide, Position, Trade};

/// Entry bookkeeping for the currently open position, carried until a sell
/// fill closes it and becomes a [`Trade`].
#[derive(Debug, Clone)]
struct OpenEntry {
    bar: usize,
    date: NaiveDate,
    commission: f64,
}

#[derive(Debug, Clone)]
pub struct Broker {
    cash: f64,
    position: Position,
    commission_rate: f64,
    trades: Vec<Trade>,
    open_entry: Option<OpenEntry>,
}

impl Broker {
    pub fn new(initial_cash: f64, commission_rate: f64) -> Self {
        Self {
            cash: initial_cash,
            position: Position::default(),
            commission_rate,
            trades: Vec::new(),
            open_entry: None,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    /// Account equity at the given price: cash + position market value.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.market_value(price)
    }

    /// Submit an order for same-bar settlement at the bar close.
    ///
    /// Drives the order through its full lifecycle and returns it in a
    /// terminal state. On `Completed` the ledger is updated atomically:
    /// cash, position, and — when a sell fully closes the position — the
    /// trade ledger.
    pub fn submit(&mut self, mut order: Order, bar: &Bar, bar_index: usize) -> Order {
        order.submit();

        let price = bar.close;
        match order.side {
            OrderSide::Buy => {
                let notional = order.size as f64 * price;
                let commission = notional * self.commission_rate;
                if notional + commission > self.cash {
                    warn!(
                        date = %bar.date,
                        size = order.size,
                        price,
                        cash = self.cash,
                        "buy order exceeds available cash, margin"
                    );
                    order.margin();
                    return order;
                }
                order.accept();
                self.cash -= notional + commission;
                self.position.add(order.size, price);
                if self.open_entry.is_none() {
                    self.open_entry = Some(OpenEntry {
                        bar: bar_index,
                        date: bar.date,
                        commission,
                    });
                } else if let Some(entry) = self.open_entry.as_mut() {
                    entry.commission += commission;
                }
                order.complete(price, commission);
                debug!(date = %bar.date, size = order.size, price, "buy filled");
            }
            OrderSide::Sell => {
                if order.size > self.position.size {
                    warn!(
                        date = %bar.date,
                        size = order.size,
                        held = self.position.size,
                        "sell order exceeds held position, rejected"
                    );
                    order.reject();
                    return order;
                }
                order.accept();
                let notional = order.size as f64 * price;
                let commission = notional * self.commission_rate;
                let avg_cost = self.position.avg_cost;
                self.cash += notional - commission;
                self.position.reduce(order.size);
                if self.position.is_flat() {
                    self.close_trade(bar, bar_index, price, order.size, avg_cost, commission);
                }
                order.complete(price, commission);
                debug!(date = %bar.date, size = order.size, price, "sell filled");
            }
        }
        order
    }

    fn close_trade(
        &mut self,
        bar: &Bar,
        bar_index: usize,
        exit_price: f64,
        size: u64,
        avg_cost: f64,
        exit_commission: f64,
    ) {
        let entry = match self.open_entry.take() {
            Some(e) => e,
            // A position with no recorded entry cannot occur through the
            // public API; guard anyway so the ledger stays consistent.
            None => OpenEntry {
                bar: bar_index,
                date: bar.date,
                commission: 0.0,
            },
        };
        let gross_pnl = (exit_price - avg_cost) * size as f64;
        let commission = entry.commission + exit_commission;
        self.trades.push(Trade {
            entry_bar: entry.bar,
            entry_date: entry.date,
            entry_price: avg_cost,
            exit_bar: bar_index,
            exit_date: bar.date,
            exit_price,
            size,
            gross_pnl,
            commission,
            net_pnl: gross_pnl - commission,
            bars_held: bar_index.saturating_sub(entry.bar),
        });
    }
}
