use std::sync::Mutex;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::exclusion::Exclusion;
use crate::aggregation::GroupScore;
use crate::coverage::CoverageOutcome;
use crate::model::Scope;
use crate::model::TimeFrame;

/// Receives data-quality events from the engine.
///
/// Events arrive after a computation has finished, in the same order as the
/// result, so an observer sees an identical stream for identical input.
pub trait AggregationObserver: Send + Sync {
  fn on_exclusion(&self, exclusion: &Exclusion);

  fn on_group(&self, _time_frame: TimeFrame, _scope: Scope, _group: &GroupScore) {}

  fn on_coverage(&self, _outcome: &CoverageOutcome) {}
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl AggregationObserver for TracingObserver {
  fn on_exclusion(&self, exclusion: &Exclusion) {
    warn!(
      company_id = %exclusion.company_id,
      time_frame = ?exclusion.time_frame,
      scope = ?exclusion.scope,
      reason = %exclusion.reason,
      "company excluded"
    );
  }

  fn on_group(&self, time_frame: TimeFrame, scope: Scope, group: &GroupScore) {
    match group {
      GroupScore::Scored(scored) => debug!(
        %time_frame,
        %scope,
        method = %scored.method,
        score = scored.score,
        contributors = scored.contributor_count,
        "group aggregated"
      ),
      GroupScore::NoData { method, reason } => info!(
        %time_frame,
        %scope,
        %method,
        reason = ?reason,
        "no data for group"
      ),
    }
  }

  fn on_coverage(&self, outcome: &CoverageOutcome) {
    match outcome {
      CoverageOutcome::Covered(coverage) => debug!(
        method = %coverage.method,
        coverage = coverage.coverage,
        covered = coverage.covered_companies,
        weighted = coverage.weighted_companies,
        "portfolio coverage computed"
      ),
      CoverageOutcome::NoWeightableCompanies { method, .. } => {
        info!(%method, "no weightable companies for coverage")
      }
    }
  }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl AggregationObserver for NoopObserver {
  fn on_exclusion(&self, _exclusion: &Exclusion) {}
}

/// Buffers exclusions for later inspection.
#[derive(Debug, Default)]
pub struct CollectingObserver {
  exclusions: Mutex<Vec<Exclusion>>,
}

impl CollectingObserver {
  /// Empty buffer.
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of the exclusions seen so far.
  pub fn exclusions(&self) -> Vec<Exclusion> {
    self
      .exclusions
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .clone()
  }
}

impl AggregationObserver for CollectingObserver {
  fn on_exclusion(&self, exclusion: &Exclusion) {
    self
      .exclusions
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .push(exclusion.clone());
  }
}
