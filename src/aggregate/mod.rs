//! Price and history aggregation over the dynamic vendor set.

pub mod history;
pub mod prices;

pub use history::HistoryAggregator;
pub use prices::PriceAggregator;
