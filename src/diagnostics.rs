//! # Diagnostics
//!
//! $$
//! \mathcal X = \{(i, \tau, s, \text{reason})\}
//! $$
//!
//! Partial-data warnings and the observer the engine reports them to.

pub mod exclusion;
pub mod observer;

pub use exclusion::Exclusion;
pub use exclusion::ExclusionReason;
pub use observer::AggregationObserver;
pub use observer::CollectingObserver;
pub use observer::NoopObserver;
pub use observer::TracingObserver;
