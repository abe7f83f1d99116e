use crate::aggregate::{aggregate_by_time, BucketWidth};
use crate::error::ConfigurationError;
use crate::sample::{Category, Sample};
use crate::validation::Validator;
use std::collections::BTreeSet;

/// Consumer-owned filter settings. Passed by value; holds no hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterConfig {
    /// Empty means every category passes.
    pub categories: BTreeSet<Category>,
    time_range: Option<(i64, i64)>,
    pub aggregation: Option<BucketWidth>,
}

impl FilterConfig {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Inclusive on both ends.
    pub fn with_time_range(mut self, start: i64, end: i64) -> Result<Self, ConfigurationError> {
        self.time_range = Some(Validator::time_range(start, end)?);
        Ok(self)
    }

    pub fn with_aggregation(mut self, width: BucketWidth) -> Self {
        self.aggregation = Some(width);
        self
    }

    pub fn time_range(&self) -> Option<(i64, i64)> {
        self.time_range
    }

    pub fn from_definition(
        definition: &dashboard::FilterDefinition,
    ) -> Result<Self, ConfigurationError> {
        let mut config = Self::all().with_categories(definition.categories.iter().map(String::as_str));
        if let Some(range) = definition.time_range {
            config = config.with_time_range(range.start, range.end)?;
        }
        config.aggregation = BucketWidth::from_aggregation(definition.aggregation)?;
        Ok(config)
    }
}

pub fn filter_by_categories(series: &[Sample], categories: &BTreeSet<Category>) -> Vec<Sample> {
    if categories.is_empty() {
        return series.to_vec();
    }
    series
        .iter()
        .filter(|s| categories.contains(&s.category))
        .cloned()
        .collect()
}

pub fn filter_by_time_range(series: &[Sample], start: i64, end: i64) -> Vec<Sample> {
    series
        .iter()
        .filter(|s| s.timestamp >= start && s.timestamp <= end)
        .cloned()
        .collect()
}

/// Category filter, then time range, then optional aggregation over a snapshot.
/// Always returns a freshly allocated series.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    config: FilterConfig,
}

impl FilterPipeline {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
    }

    pub fn apply(&self, snapshot: &[Sample]) -> Vec<Sample> {
        let mut filtered = filter_by_categories(snapshot, &self.config.categories);
        if let Some((start, end)) = self.config.time_range {
            filtered = filter_by_time_range(&filtered, start, end);
        }
        match self.config.aggregation {
            Some(width) => aggregate_by_time(&filtered, width),
            None => filtered,
        }
    }
}
