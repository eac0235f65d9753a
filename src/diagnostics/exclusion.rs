use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use crate::model::FinancialMetric;
use crate::model::Scope;
use crate::model::TimeFrame;

/// Why a company did not take part in a computation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
  /// No exposure, or a weight that cannot be resolved to an amount.
  MissingInvestmentValue,
  /// Scope-matched emissions are not reported.
  MissingEmissions,
  /// Scope-matched emissions are negative or not finite.
  InvalidEmissions,
  MissingFinancial { metric: FinancialMetric },
  /// Ownership share undefined for a zero, negative or non-finite figure.
  NonPositiveFinancial { metric: FinancialMetric },
  /// The computed weighting basis overflows.
  NonFiniteBasis,
  /// Held in the portfolio but no score in this group.
  MissingScore,
  /// The score is NaN or infinite.
  InvalidScore,
  /// Several records with different values for the same group.
  ConflictingScores,
  /// Score record for a company that is not in the portfolio.
  UnknownCompany,
  /// The scoring provider failed for this company.
  ScoreUnavailable { message: String },
  MissingGroupingAttribute { attribute: String },
}

impl Display for ExclusionReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ExclusionReason::MissingInvestmentValue => write!(f, "missing investment value"),
      ExclusionReason::MissingEmissions => write!(f, "missing emissions"),
      ExclusionReason::InvalidEmissions => write!(f, "invalid emissions"),
      ExclusionReason::MissingFinancial { metric } => write!(f, "missing {metric}"),
      ExclusionReason::NonPositiveFinancial { metric } => write!(f, "non-positive {metric}"),
      ExclusionReason::NonFiniteBasis => write!(f, "weighting basis overflows"),
      ExclusionReason::MissingScore => write!(f, "missing score"),
      ExclusionReason::InvalidScore => write!(f, "non-finite score"),
      ExclusionReason::ConflictingScores => write!(f, "conflicting score records"),
      ExclusionReason::UnknownCompany => write!(f, "not in portfolio"),
      ExclusionReason::ScoreUnavailable { message } => write!(f, "score unavailable: {message}"),
      ExclusionReason::MissingGroupingAttribute { attribute } => {
        write!(f, "missing grouping attribute `{attribute}`")
      }
    }
  }
}

/// A company left out of one group (or of the whole computation when the
/// time frame and scope are absent).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Exclusion {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_frame: Option<TimeFrame>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scope: Option<Scope>,
  pub company_id: String,
  pub reason: ExclusionReason,
}

impl Exclusion {
  /// Company-wide exclusion.
  pub fn new(company_id: impl Into<String>, reason: ExclusionReason) -> Self {
    Self {
      time_frame: None,
      scope: None,
      company_id: company_id.into(),
      reason,
    }
  }

  /// Restrict to one scope.
  pub fn in_scope(mut self, scope: Scope) -> Self {
    self.scope = Some(scope);
    self
  }

  /// Restrict to one (time frame, scope) group.
  pub fn in_group(mut self, time_frame: TimeFrame, scope: Scope) -> Self {
    self.time_frame = Some(time_frame);
    self.scope = Some(scope);
    self
  }
}

impl Display for Exclusion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.company_id)?;
    match (self.time_frame, self.scope) {
      (Some(tf), Some(scope)) => write!(f, " [{tf}/{scope}]")?,
      (None, Some(scope)) => write!(f, " [{scope}]")?,
      _ => {}
    }
    write!(f, ": {}", self.reason)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_includes_group() {
    let exclusion = Exclusion::new("C1", ExclusionReason::MissingFinancial {
      metric: FinancialMetric::Revenue,
    })
    .in_group(TimeFrame::Mid, Scope::S3);
    assert_eq!(exclusion.to_string(), "C1 [MID/S3]: missing revenue");
  }

  #[test]
  fn serializes_reason_with_kind_tag() {
    let exclusion = Exclusion::new("C2", ExclusionReason::MissingScore).in_scope(Scope::S1S2);
    let json = serde_json::to_value(&exclusion).unwrap();
    assert_eq!(json["reason"]["kind"], "missing_score");
    assert_eq!(json["scope"], "S1S2");
    assert!(json.get("time_frame").is_none());

    let back: Exclusion = serde_json::from_value(json).unwrap();
    assert_eq!(back, exclusion);
  }

  #[test]
  fn sorts_by_group_then_company() {
    let mut exclusions = vec![
      Exclusion::new("B", ExclusionReason::MissingScore).in_group(TimeFrame::Short, Scope::S1S2),
      Exclusion::new("A", ExclusionReason::MissingScore).in_group(TimeFrame::Long, Scope::S1S2),
      Exclusion::new("A", ExclusionReason::MissingScore).in_group(TimeFrame::Short, Scope::S1S2),
    ];
    exclusions.sort();
    let order: Vec<_> = exclusions
      .iter()
      .map(|e| (e.time_frame.unwrap(), e.company_id.as_str()))
      .collect();
    assert_eq!(
      order,
      vec![(TimeFrame::Short, "A"), (TimeFrame::Short, "B"), (TimeFrame::Long, "A")]
    );
  }
}
