use super::method::AggregationMethod;
use super::normalize::normalize;
use super::normalize::WeightSet;
use crate::diagnostics::ExclusionReason;
use crate::error::WeightingError;
use crate::model::Company;
use crate::model::FinancialMetric;
use crate::model::Portfolio;
use crate::model::Scope;

/// Maps a company to a non-negative, unnormalized weighting basis.
pub trait WeightingStrategy: Send + Sync {
  fn method(&self) -> AggregationMethod;

  /// Raw basis of `company` for `scope`, or the reason it has none.
  fn basis(
    &self,
    portfolio: &Portfolio,
    company: &Company,
    scope: Scope,
  ) -> Result<f64, ExclusionReason>;

  /// Normalized weights over `companies`.
  fn weights(
    &self,
    portfolio: &Portfolio,
    companies: &[&Company],
    scope: Scope,
  ) -> Result<WeightSet, WeightingError> {
    normalize(self.method(), scope, companies, |company| {
      self.basis(portfolio, company, scope)
    })
  }
}

fn investment_value(portfolio: &Portfolio, company: &Company) -> Result<f64, ExclusionReason> {
  portfolio
    .investment_value(company)
    .ok_or(ExclusionReason::MissingInvestmentValue)
}

fn scope_emissions(company: &Company, scope: Scope) -> Result<f64, ExclusionReason> {
  let emissions = company
    .emissions
    .for_scope(scope)
    .ok_or(ExclusionReason::MissingEmissions)?;
  if !emissions.is_finite() || emissions < 0.0 {
    return Err(ExclusionReason::InvalidEmissions);
  }
  Ok(emissions)
}

/// WATS: `w_i = V_i / Σ V_j`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvestmentValueWeighting;

impl WeightingStrategy for InvestmentValueWeighting {
  fn method(&self) -> AggregationMethod {
    AggregationMethod::Wats
  }

  fn basis(
    &self,
    portfolio: &Portfolio,
    company: &Company,
    _scope: Scope,
  ) -> Result<f64, ExclusionReason> {
    investment_value(portfolio, company)
  }
}

/// TETS: `w_i = E_i / Σ E_j` with scope-matched emissions.
#[derive(Clone, Copy, Debug, Default)]
pub struct TotalEmissionsWeighting;

impl WeightingStrategy for TotalEmissionsWeighting {
  fn method(&self) -> AggregationMethod {
    AggregationMethod::Tets
  }

  fn basis(
    &self,
    _portfolio: &Portfolio,
    company: &Company,
    scope: Scope,
  ) -> Result<f64, ExclusionReason> {
    scope_emissions(company, scope)
  }
}

/// Owned emissions: `w_i ∝ (V_i / F_i) · E_i` where `F_i` is the method's
/// financial metric (market cap, enterprise value, ...).
#[derive(Clone, Copy, Debug)]
pub struct OwnedEmissionsWeighting {
  method: AggregationMethod,
  metric: FinancialMetric,
}

impl OwnedEmissionsWeighting {
  /// Owned-emissions strategy for `method` measured against `metric`.
  pub const fn new(method: AggregationMethod, metric: FinancialMetric) -> Self {
    Self { method, metric }
  }

  /// Share of the company held by the portfolio.
  pub fn ownership(&self, portfolio: &Portfolio, company: &Company) -> Result<f64, ExclusionReason> {
    let value = investment_value(portfolio, company)?;
    let metric = self.metric;
    let denominator = company
      .financials
      .get(metric)
      .ok_or(ExclusionReason::MissingFinancial { metric })?;
    if !denominator.is_finite() || denominator <= 0.0 {
      return Err(ExclusionReason::NonPositiveFinancial { metric });
    }
    Ok(value / denominator)
  }
}

impl WeightingStrategy for OwnedEmissionsWeighting {
  fn method(&self) -> AggregationMethod {
    self.method
  }

  fn basis(
    &self,
    portfolio: &Portfolio,
    company: &Company,
    scope: Scope,
  ) -> Result<f64, ExclusionReason> {
    let ownership = self.ownership(portfolio, company)?;
    let emissions = scope_emissions(company, scope)?;
    Ok(ownership * emissions)
  }
}
