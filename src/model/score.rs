//! # Score Record
//!
//! $$
//! T_{i,\tau,s} \in \mathbb R, \quad \tau \in \text{time frames},\ s \in \text{scopes}
//! $$
//!
//! One temperature score per (company, time frame, scope), as delivered by the
//! scoring provider.

use impl_new_derive::ImplNew;
use serde::Deserialize;
use serde::Serialize;

use super::taxonomy::ScoreType;
use super::taxonomy::Scope;
use super::taxonomy::TimeFrame;

#[derive(ImplNew, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
  pub company_id: String,
  pub time_frame: TimeFrame,
  pub scope: Scope,
  /// Temperature score in degrees Celsius.
  pub score: f64,
  #[serde(default)]
  pub score_type: ScoreType,
}

impl ScoreRecord {
  /// Target-derived score.
  pub fn target(company_id: impl Into<String>, time_frame: TimeFrame, scope: Scope, score: f64) -> Self {
    Self::new(company_id.into(), time_frame, scope, score, ScoreType::Target)
  }

  /// Provider default score.
  pub fn default_score(
    company_id: impl Into<String>,
    time_frame: TimeFrame,
    scope: Scope,
    score: f64,
  ) -> Self {
    Self::new(company_id.into(), time_frame, scope, score, ScoreType::Default)
  }

  /// Group this record belongs to.
  pub fn key(&self) -> (TimeFrame, Scope) {
    (self.time_frame, self.scope)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn score_type_defaults_to_target() {
    let record: ScoreRecord = serde_json::from_str(
      r#"{"company_id":"A","time_frame":"SHORT","scope":"S1S2","score":1.8}"#,
    )
    .unwrap();
    assert_eq!(record, ScoreRecord::target("A", TimeFrame::Short, Scope::S1S2, 1.8));
    assert_eq!(record.key(), (TimeFrame::Short, Scope::S1S2));
  }
}
