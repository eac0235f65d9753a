//! # Portfolio Temperature
//!
//! `portfolio-temperature` aggregates company-level temperature scores into
//! portfolio-level scores under the standard weighting methodologies and
//! computes the share of a portfolio backed by approved emissions targets.
//!
//! ## Modules
//!
//! | Module          | Description                                                                          |
//! |-----------------|--------------------------------------------------------------------------------------|
//! | [`model`]       | Companies, portfolio snapshots, score records and the time frame / scope taxonomy.   |
//! | [`weighting`]   | WATS, TETS, MOTS, EOTS, ECOTS, AOTS and ROTS weighting strategies.                   |
//! | [`aggregation`] | Per (time frame, scope) aggregation with contribution breakdown and grouping.        |
//! | [`coverage`]    | Weighted share of the portfolio held in companies with an approved target.          |
//! | [`provider`]    | Upstream score provider seam and an in-memory provider.                              |
//! | [`diagnostics`] | Exclusions for partial data and the observer they are reported to.                   |
//! | [`error`]       | Configuration errors and the weighting "nothing to aggregate" signal.                |
//!
//! ## Determinism
//!
//! Companies are visited and summed in identifier order and results are stored in
//! ordered maps, so the output does not depend on the order of the input records.
//!
//! ## Parallelism
//!
//! `AggregationConfig::with_parallel(true)` evaluates (time frame, scope) groups
//! on the `rayon` pool. The result is identical to the sequential path.
//!
//! ## Logging
//!
//! Events go to an injected [`diagnostics::AggregationObserver`]. The default
//! [`diagnostics::TracingObserver`] emits `tracing` events; installing a
//! subscriber is left to the application.

pub mod aggregation;
pub mod coverage;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod provider;
pub mod weighting;

pub use aggregation::aggregate;
pub use aggregation::AggregationConfig;
pub use aggregation::GroupScore;
pub use aggregation::ScoreAggregationResult;
pub use aggregation::TemperatureAggregator;
pub use coverage::coverage;
pub use coverage::CoverageCalculator;
pub use coverage::CoverageConfig;
pub use coverage::CoverageOutcome;
pub use coverage::PortfolioCoverage;
pub use error::ConfigurationError;
pub use weighting::AggregationMethod;
