//! # Score Provider
//!
//! $$
//! \mathcal S : i \mapsto \{T_{i,\tau,s}\}_{(\tau, s) \in R}
//! $$
//!
//! Upstream seam returning per-company score records for a request `R` of time
//! frames and scopes. A failing company becomes an exclusion; it never aborts the
//! run.

use std::collections::BTreeMap;

use anyhow::anyhow;
use rayon::prelude::*;

use crate::diagnostics::Exclusion;
use crate::diagnostics::ExclusionReason;
use crate::model::Company;
use crate::model::Portfolio;
use crate::model::ScoreRecord;
use crate::model::Scope;
use crate::model::TimeFrame;

/// Requested (time frame, scope) combinations.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRequest {
  pub time_frames: Vec<TimeFrame>,
  pub scopes: Vec<Scope>,
}

impl ScoreRequest {
  /// Request for every combination of `time_frames` and `scopes`.
  pub fn new(time_frames: Vec<TimeFrame>, scopes: Vec<Scope>) -> Self {
    Self {
      time_frames,
      scopes,
    }
  }

  /// Whether `record` belongs to a requested group.
  pub fn contains(&self, record: &ScoreRecord) -> bool {
    self.time_frames.contains(&record.time_frame) && self.scopes.contains(&record.scope)
  }
}

pub trait ScoreProvider: Send + Sync {
  /// Score records of `company` for the requested groups.
  fn scores(&self, company: &Company, request: &ScoreRequest) -> anyhow::Result<Vec<ScoreRecord>>;
}

/// Provider backed by precomputed records.
#[derive(Clone, Debug, Default)]
pub struct InMemoryScoreProvider {
  records: BTreeMap<String, Vec<ScoreRecord>>,
}

impl InMemoryScoreProvider {
  /// Index `records` by company.
  pub fn new(records: Vec<ScoreRecord>) -> Self {
    let mut by_company: BTreeMap<String, Vec<ScoreRecord>> = BTreeMap::new();
    for record in records {
      by_company
        .entry(record.company_id.clone())
        .or_default()
        .push(record);
    }
    Self {
      records: by_company,
    }
  }
}

impl ScoreProvider for InMemoryScoreProvider {
  fn scores(&self, company: &Company, request: &ScoreRequest) -> anyhow::Result<Vec<ScoreRecord>> {
    let records = self
      .records
      .get(&company.id)
      .ok_or_else(|| anyhow!("no scores for company {}", company.id))?;
    Ok(
      records
        .iter()
        .filter(|record| request.contains(record))
        .cloned()
        .collect(),
    )
  }
}

/// Records gathered from a provider plus the companies it failed for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectedScores {
  pub records: Vec<ScoreRecord>,
  pub exclusions: Vec<Exclusion>,
}

/// Query `provider` for every holding of `portfolio`.
///
/// Records outside the request or belonging to another company are dropped.
pub fn collect_scores(
  provider: &dyn ScoreProvider,
  portfolio: &Portfolio,
  request: &ScoreRequest,
) -> CollectedScores {
  let responses: Vec<(&Company, anyhow::Result<Vec<ScoreRecord>>)> = portfolio
    .companies()
    .par_iter()
    .map(|company| (company, provider.scores(company, request)))
    .collect();

  let mut collected = CollectedScores::default();
  for (company, response) in responses {
    match response {
      Ok(records) => collected.records.extend(
        records
          .into_iter()
          .filter(|record| record.company_id == company.id && request.contains(record)),
      ),
      Err(err) => collected.exclusions.push(Exclusion::new(
        company.id.clone(),
        ExclusionReason::ScoreUnavailable {
          message: format!("{err:#}"),
        },
      )),
    }
  }
  collected
}

#[cfg(test)]
mod tests {
  use anyhow::bail;

  use super::*;

  struct Flaky;

  impl ScoreProvider for Flaky {
    fn scores(&self, company: &Company, _request: &ScoreRequest) -> anyhow::Result<Vec<ScoreRecord>> {
      if company.id == "B" {
        bail!("upstream timeout");
      }
      Ok(vec![
        ScoreRecord::target(company.id.clone(), TimeFrame::Mid, Scope::S1S2, 1.9),
        ScoreRecord::target(company.id.clone(), TimeFrame::Long, Scope::S3, 2.4),
        ScoreRecord::target("SOMEONE_ELSE", TimeFrame::Mid, Scope::S1S2, 9.9),
      ])
    }
  }

  fn portfolio() -> Portfolio {
    Portfolio::new(vec![
      Company::new("A", "A").with_investment_value(1.0),
      Company::new("B", "B").with_investment_value(1.0),
      Company::new("C", "C").with_investment_value(1.0),
    ])
    .unwrap()
  }

  #[test]
  fn failures_become_exclusions() {
    let request = ScoreRequest::new(vec![TimeFrame::Mid], vec![Scope::S1S2]);
    let collected = collect_scores(&Flaky, &portfolio(), &request);

    let ids: Vec<_> = collected.records.iter().map(|r| r.company_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
    assert_eq!(
      collected.exclusions,
      vec![Exclusion::new(
        "B",
        ExclusionReason::ScoreUnavailable {
          message: "upstream timeout".to_string()
        }
      )]
    );
  }

  #[test]
  fn in_memory_provider_filters_by_request() {
    let provider = InMemoryScoreProvider::new(vec![
      ScoreRecord::target("A", TimeFrame::Short, Scope::S1S2, 1.5),
      ScoreRecord::target("A", TimeFrame::Short, Scope::S3, 2.5),
      ScoreRecord::default_score("A", TimeFrame::Long, Scope::S1S2, 3.2),
    ]);
    let request = ScoreRequest::new(vec![TimeFrame::Short], vec![Scope::S1S2, Scope::S3]);
    let company = Company::new("A", "A");

    let records = provider.scores(&company, &request).unwrap();
    assert_eq!(records.len(), 2);

    let err = provider.scores(&Company::new("Z", "Z"), &request).unwrap_err();
    assert!(err.to_string().contains("Z"));
  }
}
