//! # Portfolio Coverage
//!
//! $$
//! C = 100 \cdot \frac{\sum_{i} w_i \, \mathbb 1[\text{status}_i = \text{Approved}]}{\sum_i w_i}
//! $$
//!
//! Weighted share of the portfolio held in companies with an approved target.
//! Weights come from the same strategies as aggregation and are computed once
//! over the whole portfolio.

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::instrument;

use crate::diagnostics::AggregationObserver;
use crate::diagnostics::Exclusion;
use crate::diagnostics::TracingObserver;
use crate::error::ConfigurationError;
use crate::model::Company;
use crate::model::Portfolio;
use crate::model::Scope;
use crate::weighting::AggregationMethod;

fn default_emissions_scope() -> Scope {
  Scope::S1S2
}

/// Runtime configuration for [`CoverageCalculator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
  pub method: AggregationMethod,
  /// Emissions scope used by the emissions-based methods.
  #[serde(default = "default_emissions_scope")]
  pub emissions_scope: Scope,
}

impl CoverageConfig {
  /// Configuration for `method` on the S1S2 emissions scope.
  pub fn new(method: AggregationMethod) -> Self {
    Self {
      method,
      emissions_scope: default_emissions_scope(),
    }
  }

  /// Set the emissions scope used by emissions-based methods.
  pub fn with_emissions_scope(mut self, scope: Scope) -> Self {
    self.emissions_scope = scope;
    self
  }

  /// Parse a JSON configuration.
  pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
    Ok(serde_json::from_str(json)?)
  }
}

/// Coverage of a portfolio with at least one weightable company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioCoverage {
  pub method: AggregationMethod,
  /// Percentage in `[0, 100]`.
  pub coverage: f64,
  pub covered_companies: usize,
  pub weighted_companies: usize,
  #[serde(default)]
  pub exclusions: Vec<Exclusion>,
}

/// Result of a coverage computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoverageOutcome {
  Covered(PortfolioCoverage),
  /// No company has a usable weight, or all weights are zero.
  NoWeightableCompanies {
    method: AggregationMethod,
    exclusions: Vec<Exclusion>,
  },
}

impl CoverageOutcome {
  /// Coverage percentage, `None` for the sentinel.
  pub fn coverage(&self) -> Option<f64> {
    match self {
      CoverageOutcome::Covered(covered) => Some(covered.coverage),
      CoverageOutcome::NoWeightableCompanies { .. } => None,
    }
  }

  /// Companies left out of the weighting.
  pub fn exclusions(&self) -> &[Exclusion] {
    match self {
      CoverageOutcome::Covered(covered) => &covered.exclusions,
      CoverageOutcome::NoWeightableCompanies { exclusions, .. } => exclusions,
    }
  }
}

/// Computes portfolio coverage under one weighting method.
pub struct CoverageCalculator {
  config: CoverageConfig,
  observer: Arc<dyn AggregationObserver>,
}

impl CoverageCalculator {
  /// Build a calculator reporting to [`TracingObserver`].
  pub fn new(config: CoverageConfig) -> Self {
    Self {
      config,
      observer: Arc::new(TracingObserver),
    }
  }

  /// Replace the observer exclusions and outcomes are reported to.
  pub fn with_observer(mut self, observer: Arc<dyn AggregationObserver>) -> Self {
    self.observer = observer;
    self
  }

  /// Borrow calculator configuration.
  pub fn config(&self) -> &CoverageConfig {
    &self.config
  }

  /// Coverage of `portfolio`, or the sentinel when nothing can be weighted.
  #[instrument(skip_all, fields(method = %self.config.method, companies = portfolio.len()))]
  pub fn calculate(&self, portfolio: &Portfolio) -> CoverageOutcome {
    let method = self.config.method;
    let companies: Vec<&Company> = portfolio.companies().iter().collect();

    let outcome = match method
      .strategy()
      .weights(portfolio, &companies, self.config.emissions_scope)
    {
      Ok(weights) => {
        let mut covered = 0.0;
        let mut covered_companies = 0;
        for w in &weights.weights {
          if portfolio.get(&w.company_id).is_some_and(Company::is_approved) {
            covered += w.weight;
            covered_companies += 1;
          }
        }
        CoverageOutcome::Covered(PortfolioCoverage {
          method,
          coverage: (covered * 100.0).clamp(0.0, 100.0),
          covered_companies,
          weighted_companies: weights.len(),
          exclusions: weights.exclusions,
        })
      }
      Err(err) => CoverageOutcome::NoWeightableCompanies {
        method,
        exclusions: err.into_exclusions(),
      },
    };

    for exclusion in outcome.exclusions() {
      self.observer.on_exclusion(exclusion);
    }
    self.observer.on_coverage(&outcome);
    outcome
  }
}

/// Coverage under `method`, reporting to `tracing`.
pub fn coverage(
  portfolio: &Portfolio,
  method: AggregationMethod,
) -> Result<CoverageOutcome, ConfigurationError> {
  Ok(CoverageCalculator::new(CoverageConfig::new(method)).calculate(portfolio))
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use tracing_test::traced_test;

  use super::*;
  use crate::diagnostics::CollectingObserver;
  use crate::diagnostics::ExclusionReason;
  use crate::model::FinancialMetric;
  use crate::model::TargetStatus;

  fn holding(id: &str, value: f64, status: TargetStatus) -> Company {
    Company::new(id, id)
      .with_investment_value(value)
      .with_target_status(status)
  }

  fn quiet(config: CoverageConfig) -> CoverageCalculator {
    CoverageCalculator::new(config).with_observer(Arc::new(crate::diagnostics::NoopObserver))
  }

  #[test]
  fn wats_coverage_of_approved_value() {
    let portfolio = Portfolio::new(vec![
      holding("A", 35e6, TargetStatus::Approved),
      holding("B", 10e6, TargetStatus::Pending),
      holding("C", 10e6, TargetStatus::NoTarget),
    ])
    .unwrap();

    let outcome = coverage(&portfolio, AggregationMethod::Wats).unwrap();
    let CoverageOutcome::Covered(result) = outcome else {
      panic!("expected coverage");
    };
    assert_relative_eq!(result.coverage, 35.0 / 55.0 * 100.0, epsilon = 1e-9);
    assert_relative_eq!(result.coverage, 63.636_363_6, epsilon = 1e-6);
    assert_eq!(result.covered_companies, 1);
    assert_eq!(result.weighted_companies, 3);
  }

  #[test]
  fn coverage_is_monotone_in_holdings() {
    let base = vec![
      holding("A", 20.0, TargetStatus::Approved),
      holding("B", 30.0, TargetStatus::Rejected),
    ];
    let cov = |companies: Vec<Company>| {
      quiet(CoverageConfig::new(AggregationMethod::Wats))
        .calculate(&Portfolio::new(companies).unwrap())
        .coverage()
        .unwrap()
    };

    let before = cov(base.clone());
    let mut with_approved = base.clone();
    with_approved.push(holding("C", 5.0, TargetStatus::Approved));
    let mut with_other = base;
    with_other.push(holding("D", 5.0, TargetStatus::Pending));

    assert!(cov(with_approved) > before);
    assert!(cov(with_other) < before);
  }

  #[test]
  fn zero_weight_holdings_leave_coverage_unchanged() {
    let base = vec![
      holding("A", 20.0, TargetStatus::Approved).with_emissions(Some(40.0), None),
      holding("B", 30.0, TargetStatus::Pending).with_emissions(Some(60.0), None),
    ];
    let cov = |method: AggregationMethod, companies: Vec<Company>| {
      quiet(CoverageConfig::new(method))
        .calculate(&Portfolio::new(companies).unwrap())
        .coverage()
        .unwrap()
    };

    let mut zero_value = base.clone();
    zero_value.push(holding("C", 0.0, TargetStatus::Approved).with_emissions(Some(10.0), None));
    assert_relative_eq!(
      cov(AggregationMethod::Wats, zero_value),
      cov(AggregationMethod::Wats, base.clone()),
      epsilon = 1e-12
    );

    let mut zero_emissions = base.clone();
    zero_emissions.push(holding("D", 25.0, TargetStatus::Approved).with_emissions(Some(0.0), None));
    assert_relative_eq!(
      cov(AggregationMethod::Tets, zero_emissions),
      cov(AggregationMethod::Tets, base.clone()),
      epsilon = 1e-12
    );

    let before = cov(AggregationMethod::Tets, base.clone());
    let mut with_approved = base.clone();
    with_approved.push(holding("E", 5.0, TargetStatus::Approved).with_emissions(Some(15.0), None));
    let mut with_other = base;
    with_other.push(holding("F", 5.0, TargetStatus::Rejected).with_emissions(Some(15.0), None));
    assert!(cov(AggregationMethod::Tets, with_approved) > before);
    assert!(cov(AggregationMethod::Tets, with_other) < before);
  }

  #[test]
  fn unweightable_companies_leave_both_sides() {
    let portfolio = Portfolio::new(vec![
      holding("A", 10.0, TargetStatus::Approved).with_emissions(Some(100.0), None),
      holding("B", 10.0, TargetStatus::Approved),
      holding("C", 10.0, TargetStatus::NoTarget).with_emissions(Some(300.0), None),
    ])
    .unwrap();
    let observer = Arc::new(CollectingObserver::new());

    let outcome = CoverageCalculator::new(CoverageConfig::new(AggregationMethod::Tets))
      .with_observer(observer.clone())
      .calculate(&portfolio);

    assert_relative_eq!(outcome.coverage().unwrap(), 25.0, epsilon = 1e-9);
    assert_eq!(
      observer.exclusions(),
      vec![Exclusion::new("B", ExclusionReason::MissingEmissions).in_scope(Scope::S1S2)]
    );
  }

  #[test]
  fn emissions_scope_is_configurable() {
    let portfolio = Portfolio::new(vec![
      holding("A", 10.0, TargetStatus::Approved).with_emissions(Some(1.0), Some(30.0)),
      holding("B", 10.0, TargetStatus::NoTarget).with_emissions(Some(3.0), Some(10.0)),
    ])
    .unwrap();

    let s1s2 = quiet(CoverageConfig::new(AggregationMethod::Tets)).calculate(&portfolio);
    let s3 = quiet(CoverageConfig::new(AggregationMethod::Tets).with_emissions_scope(Scope::S3))
      .calculate(&portfolio);

    assert_relative_eq!(s1s2.coverage().unwrap(), 25.0, epsilon = 1e-9);
    assert_relative_eq!(s3.coverage().unwrap(), 75.0, epsilon = 1e-9);
  }

  #[test]
  fn no_weightable_companies_is_a_sentinel() {
    let portfolio = Portfolio::new(vec![
      holding("A", 10.0, TargetStatus::Approved),
      holding("B", 10.0, TargetStatus::Pending),
    ])
    .unwrap();

    let outcome = quiet(CoverageConfig::new(AggregationMethod::Rots)).calculate(&portfolio);

    assert_eq!(outcome.coverage(), None);
    let CoverageOutcome::NoWeightableCompanies { method, exclusions } = &outcome else {
      panic!("expected sentinel");
    };
    assert_eq!(*method, AggregationMethod::Rots);
    assert!(exclusions.iter().all(|e| e.reason
      == ExclusionReason::MissingFinancial {
        metric: FinancialMetric::Revenue
      }));
    assert_eq!(serde_json::to_value(&outcome).unwrap()["status"], "no_weightable_companies");
  }

  #[test]
  fn config_parses_from_json() {
    let config = CoverageConfig::from_json(r#"{"method":"ecots"}"#).unwrap();
    assert_eq!(config, CoverageConfig::new(AggregationMethod::Ecots));

    let config = CoverageConfig::from_json(r#"{"method":"MOTS","emissions_scope":"S1S2S3"}"#).unwrap();
    assert_eq!(config.emissions_scope, Scope::S1S2S3);

    assert!(CoverageConfig::from_json(r#"{"method":"XOTS"}"#).is_err());
  }

  #[test]
  #[traced_test]
  fn coverage_is_logged() {
    let portfolio = Portfolio::new(vec![holding("A", 1.0, TargetStatus::Approved)]).unwrap();
    coverage(&portfolio, AggregationMethod::Wats).unwrap();
    assert!(logs_contain("portfolio coverage computed"));
  }
}
