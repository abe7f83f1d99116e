use crate::error::ConfigurationError;
use crate::sample::{Category, Sample};
use std::collections::HashMap;

/// Width of an aggregation bucket in milliseconds. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketWidth(i64);

impl BucketWidth {
    pub fn new(ms: i64) -> Result<Self, ConfigurationError> {
        if ms <= 0 {
            Err(ConfigurationError::InvalidBucketWidth(ms))
        } else {
            Ok(Self(ms))
        }
    }

    pub fn as_ms(self) -> i64 {
        self.0
    }

    /// Start of the bucket holding `timestamp`, flooring towards negative infinity.
    /// Saturates to `i64::MIN` when that start is not representable.
    pub fn key_for(self, timestamp: i64) -> i64 {
        timestamp
            .div_euclid(self.0)
            .checked_mul(self.0)
            .unwrap_or(i64::MIN)
    }

    /// `None` for the "no aggregation" preset.
    pub fn from_aggregation(
        aggregation: dashboard::Aggregation,
    ) -> Result<Option<Self>, ConfigurationError> {
        aggregation.bucket_ms().map(Self::new).transpose()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub bucket_key: i64,
    pub sum: f64,
    pub count: usize,
    /// Category of the first sample that landed in the bucket.
    pub representative_category: Category,
}

impl Bucket {
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    fn into_sample(self) -> Sample {
        Sample {
            timestamp: self.bucket_key,
            value: self.mean(),
            category: self.representative_category,
        }
    }
}

/// Groups samples into fixed-width time buckets, sorted by bucket key.
pub fn aggregate_buckets(series: &[Sample], width: BucketWidth) -> Vec<Bucket> {
    let mut slots: HashMap<i64, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for sample in series {
        let key = width.key_for(sample.timestamp);
        let slot = *slots.entry(key).or_insert_with(|| {
            buckets.push(Bucket {
                bucket_key: key,
                sum: 0.0,
                count: 0,
                representative_category: sample.category.clone(),
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.sum += sample.value;
        bucket.count += 1;
    }
    // Input is only assumed time ordered; first-seen order is not key order.
    buckets.sort_by_key(|bucket| bucket.bucket_key);
    buckets
}

/// Reduces every bucket to one sample carrying the mean value at the bucket start.
pub fn aggregate_by_time(series: &[Sample], width: BucketWidth) -> Vec<Sample> {
    aggregate_buckets(series, width)
        .into_iter()
        .map(Bucket::into_sample)
        .collect()
}
