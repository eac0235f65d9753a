//! # Portfolio
//!
//! $$
//! V_i =
//! \begin{cases}
//! v_i & \text{investment value} \\
//! w_i \cdot V_{\text{total}} & \text{weight}
//! \end{cases}
//! $$
//!
//! Immutable portfolio snapshot. Companies are kept sorted by identifier so every
//! downstream pass iterates in the same order.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::company::Company;
use super::company::Exposure;
use crate::error::ConfigurationError;

#[derive(Deserialize)]
struct PortfolioSnapshot {
  companies: Vec<Company>,
  #[serde(default)]
  total_value: Option<f64>,
}

impl TryFrom<PortfolioSnapshot> for Portfolio {
  type Error = ConfigurationError;

  fn try_from(snapshot: PortfolioSnapshot) -> Result<Self, Self::Error> {
    let portfolio = Portfolio::new(snapshot.companies)?;
    match snapshot.total_value {
      Some(total) => portfolio.with_total_value(total),
      None => Ok(portfolio),
    }
  }
}

/// Validated set of holdings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PortfolioSnapshot")]
pub struct Portfolio {
  companies: Vec<Company>,
  #[serde(skip_serializing_if = "Option::is_none")]
  total_value: Option<f64>,
  #[serde(skip)]
  index: HashMap<String, usize>,
  #[serde(skip)]
  notional: Option<f64>,
}

impl Portfolio {
  /// Validate and sort the holdings.
  pub fn new(mut companies: Vec<Company>) -> Result<Self, ConfigurationError> {
    for company in &companies {
      validate_exposure(company)?;
    }

    companies.sort_by(|a, b| a.id.cmp(&b.id));

    let mut index = HashMap::with_capacity(companies.len());
    for (i, company) in companies.iter().enumerate() {
      if index.insert(company.id.clone(), i).is_some() {
        return Err(ConfigurationError::DuplicateCompany(company.id.clone()));
      }
    }

    let all_weighted = !companies.is_empty()
      && companies
        .iter()
        .all(|c| matches!(c.exposure, Some(Exposure::Weight(_))));

    Ok(Self {
      companies,
      total_value: None,
      index,
      notional: all_weighted.then_some(1.0),
    })
  }

  /// Attach the total portfolio value used to turn weights into amounts.
  pub fn with_total_value(mut self, total_value: f64) -> Result<Self, ConfigurationError> {
    if !total_value.is_finite() || total_value < 0.0 {
      return Err(ConfigurationError::InvalidTotalValue(total_value));
    }
    self.total_value = Some(total_value);
    self.notional = Some(total_value);
    Ok(self)
  }

  /// Holdings, sorted by identifier.
  pub fn companies(&self) -> &[Company] {
    &self.companies
  }

  /// Holding with identifier `id`.
  pub fn get(&self, id: &str) -> Option<&Company> {
    self.index.get(id).map(|&i| &self.companies[i])
  }

  /// Whether `id` is held.
  pub fn contains(&self, id: &str) -> bool {
    self.index.contains_key(id)
  }

  /// Number of holdings.
  pub fn len(&self) -> usize {
    self.companies.len()
  }

  /// Whether the portfolio has no holdings.
  pub fn is_empty(&self) -> bool {
    self.companies.is_empty()
  }

  /// Total portfolio value, if given.
  pub fn total_value(&self) -> Option<f64> {
    self.total_value
  }

  /// Investment value of a holding.
  ///
  /// Weight-expressed holdings resolve against the total value; a portfolio made
  /// only of weights uses a notional total of 1.0. In a mixed portfolio without a
  /// total value, weight-only holdings have no investment value.
  pub fn investment_value(&self, company: &Company) -> Option<f64> {
    match company.exposure? {
      Exposure::InvestmentValue(value) => Some(value),
      Exposure::Weight(weight) => self.notional.map(|total| weight * total),
    }
  }
}

fn validate_exposure(company: &Company) -> Result<(), ConfigurationError> {
  let invalid = |reason: String| ConfigurationError::InvalidExposure {
    company_id: company.id.clone(),
    reason,
  };

  match company.exposure {
    Some(Exposure::InvestmentValue(value)) if !value.is_finite() || value < 0.0 => Err(invalid(
      format!("investment value must be finite and non-negative, got {value}"),
    )),
    Some(Exposure::Weight(weight)) if !(0.0..=1.0).contains(&weight) => {
      Err(invalid(format!("weight must lie in [0, 1], got {weight}")))
    }
    _ => Ok(()),
  }
}
