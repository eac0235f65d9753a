use serde::Deserialize;
use serde::Serialize;

use super::method::AggregationMethod;
use crate::diagnostics::Exclusion;
use crate::diagnostics::ExclusionReason;
use crate::error::WeightingError;
use crate::model::Company;
use crate::model::Scope;

/// Normalized weight of one company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyWeight {
  pub company_id: String,
  /// Unnormalized basis (investment value, emissions or owned emissions).
  pub basis: f64,
  pub weight: f64,
}

/// Weights of every company with a usable basis, sorted by company id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
  pub method: AggregationMethod,
  pub scope: Scope,
  pub weights: Vec<CompanyWeight>,
  /// `Σ b_i`, infinite when the sum overflows.
  pub total_basis: f64,
  pub exclusions: Vec<Exclusion>,
}

impl WeightSet {
  /// Normalized weight of `company_id`, `None` when excluded.
  pub fn weight(&self, company_id: &str) -> Option<f64> {
    self
      .weights
      .binary_search_by(|w| w.company_id.as_str().cmp(company_id))
      .ok()
      .map(|i| self.weights[i].weight)
  }

  /// Number of weighted companies.
  pub fn len(&self) -> usize {
    self.weights.len()
  }

  /// Whether no company was weighted.
  pub fn is_empty(&self) -> bool {
    self.weights.is_empty()
  }

  /// Sum of normalized weights, 1.0 up to rounding.
  pub fn sum(&self) -> f64 {
    self.weights.iter().map(|w| w.weight).sum()
  }
}

/// Normalize `basis` over `companies`.
///
/// Companies are visited in identifier order so the denominator is summed the
/// same way regardless of how the caller ordered them. Companies without a finite
/// basis are dropped from numerator and denominator and reported as exclusions.
pub(crate) fn normalize<F>(
  method: AggregationMethod,
  scope: Scope,
  companies: &[&Company],
  basis: F,
) -> Result<WeightSet, WeightingError>
where
  F: Fn(&Company) -> Result<f64, ExclusionReason>,
{
  let mut ordered = companies.to_vec();
  ordered.sort_by(|a, b| a.id.cmp(&b.id));

  let mut usable = Vec::with_capacity(ordered.len());
  let mut exclusions = Vec::new();

  for company in ordered {
    match basis(company) {
      Ok(b) if b.is_finite() => usable.push((company.id.clone(), b)),
      Ok(_) => exclusions.push(
        Exclusion::new(company.id.clone(), ExclusionReason::NonFiniteBasis).in_scope(scope),
      ),
      Err(reason) => exclusions.push(Exclusion::new(company.id.clone(), reason).in_scope(scope)),
    }
  }

  if usable.is_empty() {
    return Err(WeightingError::NoWeightableCompanies {
      method,
      scope,
      exclusions,
    });
  }

  let total_basis: f64 = usable.iter().map(|(_, b)| b).sum();
  if total_basis <= 0.0 {
    return Err(WeightingError::ZeroTotalWeight {
      method,
      scope,
      exclusions,
    });
  }

  // An overflowing sum is normalized relative to the largest basis.
  let (scale, scaled_total) = if total_basis.is_finite() {
    (1.0, total_basis)
  } else {
    let largest = usable.iter().map(|(_, b)| *b).fold(0.0, f64::max);
    (largest, usable.iter().map(|(_, b)| b / largest).sum::<f64>())
  };

  let weights = usable
    .into_iter()
    .map(|(company_id, basis)| CompanyWeight {
      company_id,
      basis,
      weight: basis / scale / scaled_total,
    })
    .collect();

  Ok(WeightSet {
    method,
    scope,
    weights,
    total_basis,
    exclusions,
  })
}
