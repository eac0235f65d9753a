use std::collections::BTreeMap;

use impl_new_derive::ImplNew;
use serde::Deserialize;
use serde::Serialize;

use crate::diagnostics::Exclusion;
use crate::model::ScoreType;
use crate::model::Scope;
use crate::model::TimeFrame;
use crate::weighting::AggregationMethod;

/// Audit line for one contributing company.
#[derive(ImplNew, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
  pub company_id: String,
  pub company_name: String,
  pub temperature_score: f64,
  pub score_type: ScoreType,
  /// Normalized weight `w_i`.
  pub weight: f64,
  /// `w_i · T_i`, in degrees.
  pub contribution: f64,
  /// Share of the aggregate score, in percent.
  pub contribution_relative: f64,
}

/// Why a group has no aggregate score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
  /// No holding has a score for this time frame and scope.
  NoScores,
  /// Scores exist but no scored holding has a usable weighting basis.
  NoWeightableCompanies,
  /// Usable weighting bases exist but all of them are zero.
  ZeroTotalWeight,
}

/// Aggregate of one (time frame, scope) group or of one attribute sub-group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredGroup {
  /// `Σ w_i · T_i`.
  pub score: f64,
  pub method: AggregationMethod,
  /// Weight held by target-derived scores, in percent.
  pub proportion: f64,
  /// Part of the score coming from provider default scores, in percent.
  pub influence_percentage: f64,
  pub contributor_count: usize,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contributors: Option<Vec<Contribution>>,
  /// Sub-group aggregates keyed by attribute value(s), weights re-normalized
  /// inside each sub-group.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub grouped: BTreeMap<String, GroupScore>,
}

/// Outcome for a group: a score, or an explicit marker that there is none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupScore {
  Scored(ScoredGroup),
  NoData {
    method: AggregationMethod,
    reason: NoDataReason,
  },
}

impl GroupScore {
  /// Aggregate score, `None` for a "no data" group.
  pub fn score(&self) -> Option<f64> {
    match self {
      GroupScore::Scored(scored) => Some(scored.score),
      GroupScore::NoData { .. } => None,
    }
  }

  /// Scored detail, if any.
  pub fn as_scored(&self) -> Option<&ScoredGroup> {
    match self {
      GroupScore::Scored(scored) => Some(scored),
      GroupScore::NoData { .. } => None,
    }
  }

  /// Whether this group carries the "no data" marker.
  pub fn is_no_data(&self) -> bool {
    matches!(self, GroupScore::NoData { .. })
  }

  /// Method the group was weighted with.
  pub fn method(&self) -> AggregationMethod {
    match self {
      GroupScore::Scored(scored) => scored.method,
      GroupScore::NoData { method, .. } => *method,
    }
  }
}

/// Portfolio temperature scores for every requested group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreAggregationResult {
  pub method: AggregationMethod,
  /// Keyed by scope, then time frame.
  pub scores: BTreeMap<Scope, BTreeMap<TimeFrame, GroupScore>>,
  /// Companies left out of some computation, sorted by group then company.
  #[serde(default)]
  pub exclusions: Vec<Exclusion>,
}

impl ScoreAggregationResult {
  /// Outcome of one group.
  pub fn get(&self, time_frame: TimeFrame, scope: Scope) -> Option<&GroupScore> {
    self.scores.get(&scope)?.get(&time_frame)
  }

  /// Aggregate score of a group, `None` for missing or "no data" groups.
  pub fn score(&self, time_frame: TimeFrame, scope: Scope) -> Option<f64> {
    self.get(time_frame, scope)?.score()
  }

  /// All groups in (scope, time frame) order.
  pub fn iter(&self) -> impl Iterator<Item = (TimeFrame, Scope, &GroupScore)> + '_ {
    self.scores.iter().flat_map(|(&scope, by_tf)| {
      by_tf
        .iter()
        .map(move |(&time_frame, group)| (time_frame, scope, group))
    })
  }

  /// Number of groups.
  pub fn len(&self) -> usize {
    self.scores.values().map(BTreeMap::len).sum()
  }

  /// Whether no group was requested.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Pretty-printed JSON.
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }

  /// Parse a result previously written by [`Self::to_json`].
  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_data_serializes_with_explicit_marker() {
    let group = GroupScore::NoData {
      method: AggregationMethod::Wats,
      reason: NoDataReason::NoScores,
    };
    let json = serde_json::to_value(&group).unwrap();

    assert_eq!(json["status"], "no_data");
    assert_eq!(json["reason"], "no_scores");
    assert!(json.get("score").is_none());
    assert_eq!(group.score(), None);
  }

  #[test]
  fn scored_group_is_flattened_under_status() {
    let group = GroupScore::Scored(ScoredGroup {
      score: 2.6,
      method: AggregationMethod::Wats,
      proportion: 100.0,
      influence_percentage: 0.0,
      contributor_count: 0,
      contributors: None,
      grouped: BTreeMap::new(),
    });
    let json = serde_json::to_value(&group).unwrap();

    assert_eq!(json["status"], "scored");
    assert_eq!(json["score"], 2.6);
    assert_eq!(json["method"], "WATS");
    assert!(json.get("contributors").is_none());
  }
}
