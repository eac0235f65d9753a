use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigurationError;
use crate::model::Scope;
use crate::model::TimeFrame;
use crate::weighting::AggregationMethod;

fn all_time_frames() -> Vec<TimeFrame> {
  TimeFrame::ALL.to_vec()
}

fn all_scopes() -> Vec<Scope> {
  Scope::ALL.to_vec()
}

fn enabled() -> bool {
  true
}

/// Runtime configuration for [`super::TemperatureAggregator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
  /// Weighting methodology. Always explicit.
  pub method: AggregationMethod,
  /// Requested time frames.
  #[serde(default = "all_time_frames")]
  pub time_frames: Vec<TimeFrame>,
  /// Requested scopes.
  #[serde(default = "all_scopes")]
  pub scopes: Vec<Scope>,
  /// Attach per-company contribution detail to each scored group.
  #[serde(default = "enabled")]
  pub include_contributions: bool,
  /// Company attributes to break each group down by, e.g. `["sector"]`.
  #[serde(default)]
  pub group_by: Vec<String>,
  /// Evaluate (time frame, scope) groups on the rayon pool.
  #[serde(default)]
  pub parallel: bool,
}

impl AggregationConfig {
  /// All time frames and scopes, contributions on, no grouping, sequential.
  pub fn new(method: AggregationMethod) -> Self {
    Self {
      method,
      time_frames: all_time_frames(),
      scopes: all_scopes(),
      include_contributions: true,
      group_by: Vec::new(),
      parallel: false,
    }
  }

  /// Set the requested time frames.
  pub fn with_time_frames(mut self, time_frames: Vec<TimeFrame>) -> Self {
    self.time_frames = time_frames;
    self
  }

  /// Set the requested scopes.
  pub fn with_scopes(mut self, scopes: Vec<Scope>) -> Self {
    self.scopes = scopes;
    self
  }

  /// Attach or omit per-company contribution detail.
  pub fn with_contributions(mut self, include: bool) -> Self {
    self.include_contributions = include;
    self
  }

  /// Break every group down by these company attributes.
  pub fn with_group_by<I, S>(mut self, attributes: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.group_by = attributes.into_iter().map(Into::into).collect();
    self
  }

  /// Evaluate groups on the rayon pool.
  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }

  /// Parse and validate a JSON configuration.
  pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Reject empty requests and blank grouping attributes.
  pub fn validate(&self) -> Result<(), ConfigurationError> {
    if self.time_frames.is_empty() {
      return Err(ConfigurationError::EmptyTimeFrames);
    }
    if self.scopes.is_empty() {
      return Err(ConfigurationError::EmptyScopes);
    }
    if self.group_by.iter().any(|a| a.trim().is_empty()) {
      return Err(ConfigurationError::EmptyGroupingAttribute);
    }
    Ok(())
  }

  /// Requested (time frame, scope) pairs, deduplicated, in key order.
  pub fn groups(&self) -> Vec<(TimeFrame, Scope)> {
    let mut time_frames = self.time_frames.clone();
    time_frames.sort();
    time_frames.dedup();
    let mut scopes = self.scopes.clone();
    scopes.sort();
    scopes.dedup();

    time_frames
      .iter()
      .flat_map(|&tf| scopes.iter().map(move |&scope| (tf, scope)))
      .collect()
  }
}
