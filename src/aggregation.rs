//! # Aggregation
//!
//! $$
//! T_{\tau,s} = \sum_{i \in G_{\tau,s}} w_i \, T_{i,\tau,s}
//! $$
//!
//! Portfolio temperature score per (time frame, scope) group. `G_{τ,s}` holds the
//! companies with both a score and a usable weighting basis; weights are
//! normalized over that set only.

pub mod config;
pub mod engine;
pub mod result;

pub use config::AggregationConfig;
pub use engine::aggregate;
pub use engine::TemperatureAggregator;
pub use result::Contribution;
pub use result::GroupScore;
pub use result::NoDataReason;
pub use result::ScoreAggregationResult;
pub use result::ScoredGroup;
