pub mod aggregator;
pub mod correlation;
pub mod trend;

pub use aggregator::{Aggregator, StationMeans};
pub use correlation::{average_ranks, pearson, CorrelationEngine};
pub use trend::TrendEngine;
