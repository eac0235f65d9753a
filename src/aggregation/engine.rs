use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::instrument;

use super::config::AggregationConfig;
use super::result::Contribution;
use super::result::GroupScore;
use super::result::NoDataReason;
use super::result::ScoreAggregationResult;
use super::result::ScoredGroup;
use crate::diagnostics::AggregationObserver;
use crate::diagnostics::Exclusion;
use crate::diagnostics::ExclusionReason;
use crate::diagnostics::TracingObserver;
use crate::error::ConfigurationError;
use crate::error::WeightingError;
use crate::model::Company;
use crate::model::Portfolio;
use crate::model::ScoreRecord;
use crate::model::ScoreType;
use crate::model::Scope;
use crate::model::TimeFrame;
use crate::provider::collect_scores;
use crate::provider::ScoreProvider;
use crate::provider::ScoreRequest;
use crate::weighting::AggregationMethod;

/// Score lookup slot for one company inside one group.
#[derive(Clone, Copy)]
enum Slot<'a> {
  Single(&'a ScoreRecord),
  Conflict,
}

type GroupIndex<'a> = HashMap<(TimeFrame, Scope), BTreeMap<&'a str, Slot<'a>>>;

type Member<'a> = (&'a Company, &'a ScoreRecord);

/// Aggregates company temperature scores into portfolio scores.
pub struct TemperatureAggregator {
  config: AggregationConfig,
  observer: Arc<dyn AggregationObserver>,
}

impl TemperatureAggregator {
  /// Validate `config` and build an aggregator reporting to [`TracingObserver`].
  pub fn new(config: AggregationConfig) -> Result<Self, ConfigurationError> {
    config.validate()?;
    Ok(Self {
      config,
      observer: Arc::new(TracingObserver),
    })
  }

  /// Replace the observer exclusions and group outcomes are reported to.
  pub fn with_observer(mut self, observer: Arc<dyn AggregationObserver>) -> Self {
    self.observer = observer;
    self
  }

  /// Borrow aggregator configuration.
  pub fn config(&self) -> &AggregationConfig {
    &self.config
  }

  /// Weighting method in use.
  pub fn method(&self) -> AggregationMethod {
    self.config.method
  }

  /// Aggregate `records` over the holdings of `portfolio`.
  ///
  /// Every requested (time frame, scope) pair appears in the result, either
  /// scored or marked as having no data.
  #[instrument(
    skip_all,
    fields(method = %self.config.method, companies = portfolio.len(), records = records.len())
  )]
  pub fn aggregate(&self, portfolio: &Portfolio, records: &[ScoreRecord]) -> ScoreAggregationResult {
    self.run(portfolio, records, Vec::new())
  }

  /// Fetch scores from `provider` and aggregate them. Provider failures become
  /// exclusions of the affected companies.
  #[instrument(skip_all, fields(method = %self.config.method, companies = portfolio.len()))]
  pub fn aggregate_from_provider(
    &self,
    provider: &dyn ScoreProvider,
    portfolio: &Portfolio,
  ) -> ScoreAggregationResult {
    let request = ScoreRequest::new(self.config.time_frames.clone(), self.config.scopes.clone());
    let collected = collect_scores(provider, portfolio, &request);
    self.run(portfolio, &collected.records, collected.exclusions)
  }

  fn run(
    &self,
    portfolio: &Portfolio,
    records: &[ScoreRecord],
    mut exclusions: Vec<Exclusion>,
  ) -> ScoreAggregationResult {
    let groups = self.config.groups();
    let index = index_records(portfolio, records, &groups, &mut exclusions);

    let outcomes: Vec<(GroupScore, Vec<Exclusion>)> = if self.config.parallel {
      groups
        .par_iter()
        .map(|&(tf, scope)| self.evaluate_group(portfolio, index.get(&(tf, scope)), tf, scope))
        .collect()
    } else {
      groups
        .iter()
        .map(|&(tf, scope)| self.evaluate_group(portfolio, index.get(&(tf, scope)), tf, scope))
        .collect()
    };

    let mut scores: BTreeMap<Scope, BTreeMap<TimeFrame, GroupScore>> = BTreeMap::new();
    for (&(tf, scope), (group, group_exclusions)) in groups.iter().zip(outcomes) {
      exclusions.extend(group_exclusions);
      scores.entry(scope).or_default().insert(tf, group);
    }

    exclusions.sort();
    exclusions.dedup();

    let result = ScoreAggregationResult {
      method: self.config.method,
      scores,
      exclusions,
    };
    self.notify(&result);
    result
  }

  fn notify(&self, result: &ScoreAggregationResult) {
    for exclusion in &result.exclusions {
      self.observer.on_exclusion(exclusion);
    }
    for (tf, scope, group) in result.iter() {
      self.observer.on_group(tf, scope, group);
    }
  }

  fn evaluate_group(
    &self,
    portfolio: &Portfolio,
    slots: Option<&BTreeMap<&str, Slot<'_>>>,
    tf: TimeFrame,
    scope: Scope,
  ) -> (GroupScore, Vec<Exclusion>) {
    let method = self.config.method;
    let Some(slots) = slots.filter(|s| !s.is_empty()) else {
      return (
        GroupScore::NoData {
          method,
          reason: NoDataReason::NoScores,
        },
        Vec::new(),
      );
    };

    let mut exclusions = Vec::new();
    let mut members: Vec<Member<'_>> = Vec::new();
    for company in portfolio.companies() {
      match slots.get(company.id.as_str()) {
        Some(Slot::Single(record)) => members.push((company, *record)),
        Some(Slot::Conflict) => exclusions.push(
          Exclusion::new(company.id.clone(), ExclusionReason::ConflictingScores).in_group(tf, scope),
        ),
        None => exclusions.push(
          Exclusion::new(company.id.clone(), ExclusionReason::MissingScore).in_group(tf, scope),
        ),
      }
    }

    if members.is_empty() {
      return (
        GroupScore::NoData {
          method,
          reason: NoDataReason::NoScores,
        },
        exclusions,
      );
    }

    let (mut group, member_exclusions) = self.score_members(portfolio, &members, tf, scope);
    exclusions.extend(member_exclusions);

    if let GroupScore::Scored(scored) = &mut group {
      if !self.config.group_by.is_empty() {
        scored.grouped = self.score_sub_groups(portfolio, &members, tf, scope, &mut exclusions);
      }
    }

    (group, exclusions)
  }

  /// Weighted score over `members`, which are sorted by company id.
  fn score_members(
    &self,
    portfolio: &Portfolio,
    members: &[Member<'_>],
    tf: TimeFrame,
    scope: Scope,
  ) -> (GroupScore, Vec<Exclusion>) {
    let method = self.config.method;
    let companies: Vec<&Company> = members.iter().map(|(company, _)| *company).collect();

    let weights = match method.strategy().weights(portfolio, &companies, scope) {
      Ok(weights) => weights,
      Err(err) => {
        let reason = match &err {
          WeightingError::NoWeightableCompanies { .. } => NoDataReason::NoWeightableCompanies,
          WeightingError::ZeroTotalWeight { .. } => NoDataReason::ZeroTotalWeight,
        };
        let exclusions = err
          .into_exclusions()
          .into_iter()
          .map(|e| e.in_group(tf, scope))
          .collect();
        return (GroupScore::NoData { method, reason }, exclusions);
      }
    };

    let mut score = 0.0;
    let mut target_weight = 0.0;
    let mut default_contribution = 0.0;
    let mut lines = Vec::with_capacity(weights.len());

    for &(company, record) in members {
      let Some(weight) = weights.weight(&company.id) else {
        continue;
      };
      let contribution = weight * record.score;
      score += contribution;
      match record.score_type {
        ScoreType::Target => target_weight += weight,
        ScoreType::Default => default_contribution += contribution,
      }
      lines.push((company, record, weight, contribution));
    }

    let relative = |part: f64| if score != 0.0 { part / score * 100.0 } else { 0.0 };

    let contributors = self.config.include_contributions.then(|| {
      let mut contributors: Vec<Contribution> = lines
        .iter()
        .map(|&(company, record, weight, contribution)| {
          Contribution::new(
            company.id.clone(),
            company.name.clone(),
            record.score,
            record.score_type,
            weight,
            contribution,
            relative(contribution),
          )
        })
        .collect();
      contributors.sort_by_key(|c| (Reverse(OrderedFloat(c.contribution)), c.company_id.clone()));
      contributors
    });

    let group = GroupScore::Scored(ScoredGroup {
      score,
      method,
      proportion: target_weight * 100.0,
      influence_percentage: relative(default_contribution),
      contributor_count: lines.len(),
      contributors,
      grouped: BTreeMap::new(),
    });

    let exclusions = weights
      .exclusions
      .into_iter()
      .map(|e| e.in_group(tf, scope))
      .collect();

    (group, exclusions)
  }

  fn score_sub_groups(
    &self,
    portfolio: &Portfolio,
    members: &[Member<'_>],
    tf: TimeFrame,
    scope: Scope,
    exclusions: &mut Vec<Exclusion>,
  ) -> BTreeMap<String, GroupScore> {
    let mut buckets: BTreeMap<String, Vec<Member<'_>>> = BTreeMap::new();
    for &(company, record) in members {
      match group_key(company, &self.config.group_by) {
        Ok(key) => buckets.entry(key).or_default().push((company, record)),
        Err(attribute) => exclusions.push(
          Exclusion::new(
            company.id.clone(),
            ExclusionReason::MissingGroupingAttribute { attribute },
          )
          .in_group(tf, scope),
        ),
      }
    }

    buckets
      .into_iter()
      .map(|(key, bucket)| {
        let (group, bucket_exclusions) = self.score_members(portfolio, &bucket, tf, scope);
        exclusions.extend(bucket_exclusions);
        (key, group)
      })
      .collect()
  }
}

/// Attribute values joined with `-`, or the first missing attribute.
fn group_key(company: &Company, attributes: &[String]) -> Result<String, String> {
  let mut parts = Vec::with_capacity(attributes.len());
  for attribute in attributes {
    match company.attributes.get(attribute) {
      Some(value) => parts.push(value.as_str()),
      None => return Err(attribute.clone()),
    }
  }
  Ok(parts.join("-"))
}

fn index_records<'a>(
  portfolio: &Portfolio,
  records: &'a [ScoreRecord],
  groups: &[(TimeFrame, Scope)],
  exclusions: &mut Vec<Exclusion>,
) -> GroupIndex<'a> {
  let requested: HashSet<(TimeFrame, Scope)> = groups.iter().copied().collect();
  let mut index: GroupIndex<'a> = HashMap::new();

  for record in records {
    let (tf, scope) = record.key();
    if !requested.contains(&(tf, scope)) {
      continue;
    }
    if !portfolio.contains(&record.company_id) {
      exclusions.push(
        Exclusion::new(record.company_id.clone(), ExclusionReason::UnknownCompany).in_group(tf, scope),
      );
      continue;
    }
    if !record.score.is_finite() {
      exclusions.push(
        Exclusion::new(record.company_id.clone(), ExclusionReason::InvalidScore).in_group(tf, scope),
      );
      continue;
    }

    let slot = index
      .entry((tf, scope))
      .or_default()
      .entry(record.company_id.as_str())
      .or_insert(Slot::Single(record));
    if let Slot::Single(existing) = *slot {
      let same = existing.score == record.score && existing.score_type == record.score_type;
      if !same {
        *slot = Slot::Conflict;
      }
    }
  }

  index
}

/// Aggregate with an explicit method and request, reporting to `tracing`.
pub fn aggregate(
  portfolio: &Portfolio,
  records: &[ScoreRecord],
  time_frames: &[TimeFrame],
  scopes: &[Scope],
  method: AggregationMethod,
) -> Result<ScoreAggregationResult, ConfigurationError> {
  let config = AggregationConfig::new(method)
    .with_time_frames(time_frames.to_vec())
    .with_scopes(scopes.to_vec());
  Ok(TemperatureAggregator::new(config)?.aggregate(portfolio, records))
}
