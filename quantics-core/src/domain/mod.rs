//! Domain types: bars, orders, positions, trades.

pub mod bar;
pub mod order;
pub mod position;
pub mod trade;

pub use bar::{Bar, BarSeries};
pub use order::{Order, OrderSide, OrderStatus};
pub use position::Position;
pub use trade::Trade;
