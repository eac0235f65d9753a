//! # Weighting Strategies
//!
//! $$
//! w_i = \frac{b_i}{\sum_{j \in G} b_j}, \qquad
//! b_i =
//! \begin{cases}
//! V_i & \text{WATS} \\
//! E_i^{(s)} & \text{TETS} \\
//! \dfrac{V_i}{F_i}\,E_i^{(s)} & \text{MOTS, EOTS, ECOTS, AOTS, ROTS}
//! \end{cases}
//! $$
//!
//! One strategy per aggregation method. `V_i` is the investment value, `E_i^{(s)}`
//! the scope-matched emissions and `F_i` the method's financial metric:
//!
//! | Method | `F_i` |
//! |--------|-------|
//! | MOTS   | market capitalization |
//! | EOTS   | enterprise value |
//! | ECOTS  | enterprise value including cash |
//! | AOTS   | total assets |
//! | ROTS   | revenue |

pub mod method;
pub mod normalize;
pub mod strategy;

pub use method::AggregationMethod;
pub use normalize::CompanyWeight;
pub use normalize::WeightSet;
pub use strategy::InvestmentValueWeighting;
pub use strategy::OwnedEmissionsWeighting;
pub use strategy::TotalEmissionsWeighting;
pub use strategy::WeightingStrategy;
