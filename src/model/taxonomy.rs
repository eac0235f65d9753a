//! # Taxonomy
//!
//! $$
//! (\tau, s) \in \{\text{SHORT},\text{MID},\text{LONG}\}\times\{\text{S1S2},\text{S3},\text{S1S2S3}\}
//! $$
//!
//! Closed enumerations shared by scores, weights and results.

use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigurationError;

/// Scoring horizon of a temperature score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeFrame {
  Short,
  Mid,
  Long,
}

impl TimeFrame {
  pub const ALL: [TimeFrame; 3] = [TimeFrame::Short, TimeFrame::Mid, TimeFrame::Long];

  /// Upper-case name.
  pub fn as_str(&self) -> &'static str {
    match self {
      TimeFrame::Short => "SHORT",
      TimeFrame::Mid => "MID",
      TimeFrame::Long => "LONG",
    }
  }
}

impl Display for TimeFrame {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TimeFrame {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "SHORT" => Ok(Self::Short),
      "MID" => Ok(Self::Mid),
      "LONG" => Ok(Self::Long),
      _ => Err(ConfigurationError::UnknownTimeFrame(s.to_string())),
    }
  }
}

/// Emissions scope combination a score refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
  /// Direct and energy-indirect emissions.
  S1S2,
  /// Value-chain emissions.
  S3,
  /// Combined scopes 1, 2 and 3.
  S1S2S3,
}

impl Scope {
  pub const ALL: [Scope; 3] = [Scope::S1S2, Scope::S3, Scope::S1S2S3];

  /// Upper-case name.
  pub fn as_str(&self) -> &'static str {
    match self {
      Scope::S1S2 => "S1S2",
      Scope::S3 => "S3",
      Scope::S1S2S3 => "S1S2S3",
    }
  }
}

impl Display for Scope {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Scope {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "S1S2" => Ok(Self::S1S2),
      "S3" => Ok(Self::S3),
      "S1S2S3" => Ok(Self::S1S2S3),
      _ => Err(ConfigurationError::UnknownScope(s.to_string())),
    }
  }
}

/// External validation state of a company's emissions target.
#[derive(
  Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
  #[default]
  NoTarget,
  Pending,
  Approved,
  Rejected,
}

impl Display for TargetStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TargetStatus::NoTarget => write!(f, "no target"),
      TargetStatus::Pending => write!(f, "pending"),
      TargetStatus::Approved => write!(f, "approved"),
      TargetStatus::Rejected => write!(f, "rejected"),
    }
  }
}

impl FromStr for TargetStatus {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
      "no_target" | "notarget" | "none" => Ok(Self::NoTarget),
      "pending" => Ok(Self::Pending),
      "approved" | "validated" => Ok(Self::Approved),
      "rejected" => Ok(Self::Rejected),
      _ => Err(ConfigurationError::UnknownTargetStatus(s.to_string())),
    }
  }
}

/// Origin of a temperature score as reported by the scoring provider.
#[derive(
  Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
  /// Derived from a disclosed emissions target.
  #[default]
  Target,
  /// Provider fallback for companies without a usable target.
  Default,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_names_case_insensitively() {
    assert_eq!("short".parse::<TimeFrame>().unwrap(), TimeFrame::Short);
    assert_eq!(" LONG ".parse::<TimeFrame>().unwrap(), TimeFrame::Long);
    assert_eq!("s1s2s3".parse::<Scope>().unwrap(), Scope::S1S2S3);
    assert_eq!("Validated".parse::<TargetStatus>().unwrap(), TargetStatus::Approved);
    assert_eq!("no target".parse::<TargetStatus>().unwrap(), TargetStatus::NoTarget);
  }

  #[test]
  fn rejects_unknown_names() {
    assert!(matches!(
      "WEEKLY".parse::<TimeFrame>(),
      Err(ConfigurationError::UnknownTimeFrame(_))
    ));
    assert!(matches!(
      "S2".parse::<Scope>(),
      Err(ConfigurationError::UnknownScope(_))
    ));
  }

  #[test]
  fn serde_uses_methodology_names() {
    assert_eq!(serde_json::to_string(&TimeFrame::Mid).unwrap(), "\"MID\"");
    assert_eq!(serde_json::to_string(&Scope::S1S2S3).unwrap(), "\"S1S2S3\"");
    assert_eq!(
      serde_json::to_string(&TargetStatus::NoTarget).unwrap(),
      "\"no_target\""
    );
  }

  #[test]
  fn ordering_follows_declaration() {
    assert!(TimeFrame::Short < TimeFrame::Mid && TimeFrame::Mid < TimeFrame::Long);
    assert!(Scope::S1S2 < Scope::S3 && Scope::S3 < Scope::S1S2S3);
  }
}
