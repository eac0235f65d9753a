//! # Errors
//!
//! Fatal configuration errors and the strategy-level "nothing to aggregate" signal.
//! Missing data on individual companies is never an error; it is reported through
//! [`crate::diagnostics::Exclusion`].

use thiserror::Error;

use crate::diagnostics::Exclusion;
use crate::model::Scope;
use crate::weighting::AggregationMethod;

/// Invalid request or snapshot. Returned immediately, nothing is computed.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  #[error("unknown aggregation method `{0}`, expected one of WATS, TETS, MOTS, EOTS, ECOTS, AOTS, ROTS")]
  UnknownMethod(String),

  #[error("unknown time frame `{0}`, expected SHORT, MID or LONG")]
  UnknownTimeFrame(String),

  #[error("unknown scope `{0}`, expected S1S2, S3 or S1S2S3")]
  UnknownScope(String),

  #[error("unknown target status `{0}`")]
  UnknownTargetStatus(String),

  #[error("at least one time frame must be requested")]
  EmptyTimeFrames,

  #[error("at least one scope must be requested")]
  EmptyScopes,

  #[error("grouping attribute names must not be empty")]
  EmptyGroupingAttribute,

  #[error("company `{0}` appears more than once in the portfolio")]
  DuplicateCompany(String),

  #[error("invalid exposure for company `{company_id}`: {reason}")]
  InvalidExposure { company_id: String, reason: String },

  #[error("total portfolio value must be finite and non-negative, got {0}")]
  InvalidTotalValue(f64),

  #[error("malformed configuration: {0}")]
  Malformed(#[from] serde_json::Error),
}

/// A weighting strategy found nothing to aggregate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightingError {
  #[error("no company has a usable {method} weighting basis for {scope}")]
  NoWeightableCompanies {
    method: AggregationMethod,
    scope: Scope,
    exclusions: Vec<Exclusion>,
  },

  #[error("{method} weighting bases sum to zero for {scope}")]
  ZeroTotalWeight {
    method: AggregationMethod,
    scope: Scope,
    exclusions: Vec<Exclusion>,
  },
}

impl WeightingError {
  /// Companies dropped while looking for a usable basis.
  pub fn exclusions(&self) -> &[Exclusion] {
    match self {
      WeightingError::NoWeightableCompanies { exclusions, .. }
      | WeightingError::ZeroTotalWeight { exclusions, .. } => exclusions,
    }
  }

  /// Take the exclusions by value.
  pub fn into_exclusions(self) -> Vec<Exclusion> {
    match self {
      WeightingError::NoWeightableCompanies { exclusions, .. }
      | WeightingError::ZeroTotalWeight { exclusions, .. } => exclusions,
    }
  }
}
