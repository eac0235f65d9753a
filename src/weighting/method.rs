use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::strategy::InvestmentValueWeighting;
use super::strategy::OwnedEmissionsWeighting;
use super::strategy::TotalEmissionsWeighting;
use super::strategy::WeightingStrategy;
use crate::error::ConfigurationError;
use crate::model::FinancialMetric;

/// Portfolio weighting methodology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum AggregationMethod {
  /// Weighted average temperature score (investment value).
  Wats,
  /// Total emissions weighted temperature score.
  Tets,
  /// Market-cap owned emissions weighted temperature score.
  Mots,
  /// Enterprise-value owned emissions weighted temperature score.
  Eots,
  /// Enterprise-value-including-cash owned emissions weighted temperature score.
  Ecots,
  /// Total-assets owned emissions weighted temperature score.
  Aots,
  /// Revenue owned emissions weighted temperature score.
  Rots,
}

/// Dispatch table indexed by discriminant, same order as [`AggregationMethod`].
const STRATEGIES: [&dyn WeightingStrategy; 7] = [
  &InvestmentValueWeighting,
  &TotalEmissionsWeighting,
  &OwnedEmissionsWeighting::new(AggregationMethod::Mots, FinancialMetric::MarketCap),
  &OwnedEmissionsWeighting::new(AggregationMethod::Eots, FinancialMetric::EnterpriseValue),
  &OwnedEmissionsWeighting::new(
    AggregationMethod::Ecots,
    FinancialMetric::EnterpriseValueWithCash,
  ),
  &OwnedEmissionsWeighting::new(AggregationMethod::Aots, FinancialMetric::TotalAssets),
  &OwnedEmissionsWeighting::new(AggregationMethod::Rots, FinancialMetric::Revenue),
];

impl AggregationMethod {
  pub const ALL: [AggregationMethod; 7] = [
    AggregationMethod::Wats,
    AggregationMethod::Tets,
    AggregationMethod::Mots,
    AggregationMethod::Eots,
    AggregationMethod::Ecots,
    AggregationMethod::Aots,
    AggregationMethod::Rots,
  ];

  /// Weighting strategy implementing this method.
  pub fn strategy(self) -> &'static dyn WeightingStrategy {
    STRATEGIES[self as usize]
  }

  /// Acronym used in configuration and output.
  pub fn as_str(&self) -> &'static str {
    match self {
      AggregationMethod::Wats => "WATS",
      AggregationMethod::Tets => "TETS",
      AggregationMethod::Mots => "MOTS",
      AggregationMethod::Eots => "EOTS",
      AggregationMethod::Ecots => "ECOTS",
      AggregationMethod::Aots => "AOTS",
      AggregationMethod::Rots => "ROTS",
    }
  }
}

impl Display for AggregationMethod {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for AggregationMethod {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Self::ALL
      .into_iter()
      .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| ConfigurationError::UnknownMethod(s.to_string()))
  }
}

impl TryFrom<String> for AggregationMethod {
  type Error = ConfigurationError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dispatch_table_matches_discriminants() {
    for method in AggregationMethod::ALL {
      assert_eq!(method.strategy().method(), method);
    }
  }

  #[test]
  fn parses_known_methods_only() {
    assert_eq!("wats".parse::<AggregationMethod>().unwrap(), AggregationMethod::Wats);
    assert_eq!(" ECOTS".parse::<AggregationMethod>().unwrap(), AggregationMethod::Ecots);

    let err = "EQUAL".parse::<AggregationMethod>().unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownMethod(name) if name == "EQUAL"));
  }

  #[test]
  fn serde_round_trip_uses_acronyms() {
    let json = serde_json::to_string(&AggregationMethod::Rots).unwrap();
    assert_eq!(json, "\"ROTS\"");
    let back: AggregationMethod = serde_json::from_str("\"rots\"").unwrap();
    assert_eq!(back, AggregationMethod::Rots);
    assert!(serde_json::from_str::<AggregationMethod>("\"XOTS\"").is_err());
  }
}
