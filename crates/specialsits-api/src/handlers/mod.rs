mod datasets;
mod health;

pub use datasets::{root_summary, ticker_detail};
pub use health::health_check;
