//! # Company
//!
//! $$
//! E_i^{(s)} =
//! \begin{cases}
//! E_i^{S1S2} & s = \text{S1S2} \\
//! E_i^{S3} & s = \text{S3} \\
//! E_i^{S1S2} + E_i^{S3} & s = \text{S1S2S3}
//! \end{cases}
//! $$
//!
//! Per-holding company record: exposure, financials, emissions and target status.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use super::taxonomy::Scope;
use super::taxonomy::TargetStatus;

/// How much of the portfolio sits in a company.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
  /// Invested amount in portfolio currency.
  InvestmentValue(f64),
  /// Fraction of the portfolio, in `[0, 1]`.
  Weight(f64),
}

/// Reported emissions in tCO2e.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Emissions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub s1s2: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub s3: Option<f64>,
}

impl Emissions {
  /// Emissions per scope, in tCO2e.
  pub fn new(s1s2: Option<f64>, s3: Option<f64>) -> Self {
    Self { s1s2, s3 }
  }

  /// Scope-matched emissions. The combined scope needs both components.
  pub fn for_scope(&self, scope: Scope) -> Option<f64> {
    match scope {
      Scope::S1S2 => self.s1s2,
      Scope::S3 => self.s3,
      Scope::S1S2S3 => match (self.s1s2, self.s3) {
        (Some(s1s2), Some(s3)) => Some(s1s2 + s3),
        _ => None,
      },
    }
  }
}

/// Company-level financial figure an ownership share is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialMetric {
  MarketCap,
  EnterpriseValue,
  EnterpriseValueWithCash,
  TotalAssets,
  Revenue,
}

impl Display for FinancialMetric {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FinancialMetric::MarketCap => write!(f, "market cap"),
      FinancialMetric::EnterpriseValue => write!(f, "enterprise value"),
      FinancialMetric::EnterpriseValueWithCash => write!(f, "enterprise value incl. cash"),
      FinancialMetric::TotalAssets => write!(f, "total assets"),
      FinancialMetric::Revenue => write!(f, "revenue"),
    }
  }
}

/// Optional company financials, same currency as the portfolio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Financials {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub market_cap: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enterprise_value: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enterprise_value_with_cash: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total_assets: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub revenue: Option<f64>,
}

impl Financials {
  /// Reported value of `metric`.
  pub fn get(&self, metric: FinancialMetric) -> Option<f64> {
    match metric {
      FinancialMetric::MarketCap => self.market_cap,
      FinancialMetric::EnterpriseValue => self.enterprise_value,
      FinancialMetric::EnterpriseValueWithCash => self.enterprise_value_with_cash,
      FinancialMetric::TotalAssets => self.total_assets,
      FinancialMetric::Revenue => self.revenue,
    }
  }

  /// Record a value for `metric`.
  pub fn set(&mut self, metric: FinancialMetric, value: f64) {
    let slot = match metric {
      FinancialMetric::MarketCap => &mut self.market_cap,
      FinancialMetric::EnterpriseValue => &mut self.enterprise_value,
      FinancialMetric::EnterpriseValueWithCash => &mut self.enterprise_value_with_cash,
      FinancialMetric::TotalAssets => &mut self.total_assets,
      FinancialMetric::Revenue => &mut self.revenue,
    };
    *slot = Some(value);
  }
}

/// A single portfolio holding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
  /// Identifier, unique within a portfolio.
  pub id: String,
  /// Display name.
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exposure: Option<Exposure>,
  #[serde(default)]
  pub financials: Financials,
  #[serde(default)]
  pub emissions: Emissions,
  #[serde(default)]
  pub target_status: TargetStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub engagement_target: Option<bool>,
  /// Free-form attributes (sector, region, ...) used for grouped aggregation.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub attributes: BTreeMap<String, String>,
}

impl Company {
  /// Company with no exposure, financials or emissions.
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      exposure: None,
      financials: Financials::default(),
      emissions: Emissions::default(),
      target_status: TargetStatus::NoTarget,
      engagement_target: None,
      attributes: BTreeMap::new(),
    }
  }

  /// Exposure as an invested amount.
  pub fn with_investment_value(mut self, value: f64) -> Self {
    self.exposure = Some(Exposure::InvestmentValue(value));
    self
  }

  /// Exposure as a fraction of the portfolio.
  pub fn with_weight(mut self, weight: f64) -> Self {
    self.exposure = Some(Exposure::Weight(weight));
    self
  }

  /// Set S1S2 and S3 emissions.
  pub fn with_emissions(mut self, s1s2: Option<f64>, s3: Option<f64>) -> Self {
    self.emissions = Emissions::new(s1s2, s3);
    self
  }

  /// Set one financial figure.
  pub fn with_financial(mut self, metric: FinancialMetric, value: f64) -> Self {
    self.financials.set(metric, value);
    self
  }

  /// Set the target validation status.
  pub fn with_target_status(mut self, status: TargetStatus) -> Self {
    self.target_status = status;
    self
  }

  /// Flag an engagement target.
  pub fn with_engagement_target(mut self, engaged: bool) -> Self {
    self.engagement_target = Some(engaged);
    self
  }

  /// Add a grouping attribute.
  pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.insert(key.into(), value.into());
    self
  }

  /// Whether the target is approved.
  pub fn is_approved(&self) -> bool {
    self.target_status == TargetStatus::Approved
  }
}
