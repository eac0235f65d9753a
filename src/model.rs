//! # Model
//!
//! $$
//! \mathcal P = \{(i, V_i, F_i, E_i, \text{status}_i)\}_{i=1}^{n}
//! $$
//!
//! Portfolio snapshot and score records consumed by the engine.

pub mod company;
pub mod portfolio;
pub mod score;
pub mod taxonomy;

pub use company::Company;
pub use company::Emissions;
pub use company::Exposure;
pub use company::FinancialMetric;
pub use company::Financials;
pub use portfolio::Portfolio;
pub use score::ScoreRecord;
pub use taxonomy::ScoreType;
pub use taxonomy::Scope;
pub use taxonomy::TargetStatus;
pub use taxonomy::TimeFrame;
