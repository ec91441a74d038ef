pub mod aggregator;
pub mod metrics;

pub use aggregator::{PositionAggregator, validate_address, value_position};
pub use metrics::{RiskMetrics, compute_metrics};
