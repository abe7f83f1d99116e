use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use streamview_core::Sample;

const CATEGORIES: [&str; 5] = ["A", "B", "C", "D", "E"];
const HISTORY_SPACING_MS: i64 = 100;

/// Synthetic source of samples: a bounded random walk for live points and a
/// noisy sine trend for history.
pub struct SyntheticProducer {
    rng: StdRng,
    last_value: f64,
}

impl SyntheticProducer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            last_value: 50.0,
        }
    }

    /// `count` samples spaced 100 ms apart, ending just before `now_ms`.
    pub fn history(&mut self, count: usize, now_ms: i64) -> Vec<Sample> {
        let samples: Vec<Sample> = (0..count)
            .map(|i| {
                let timestamp = now_ms - (count - i) as i64 * HISTORY_SPACING_MS;
                let trend = (i as f64 / 100.0).sin() * 30.0;
                let noise = (self.rng.random::<f64>() - 0.5) * 20.0;
                let value = (50.0 + trend + noise).clamp(0.0, 100.0);
                Sample::new(timestamp, value, CATEGORIES[i % CATEGORIES.len()])
            })
            .collect();
        if let Some(last) = samples.last() {
            self.last_value = last.value;
        }
        samples
    }

    /// Next point of the walk, moving at most 5 units from the previous one.
    pub fn next_point(&mut self, now_ms: i64) -> Sample {
        let change = (self.rng.random::<f64>() - 0.5) * 10.0;
        self.last_value = (self.last_value + change).clamp(0.0, 100.0);
        let category = CATEGORIES[self.rng.random_range(0..CATEGORIES.len())];
        Sample::new(now_ms, self.last_value, category)
    }

    pub fn batch(&mut self, count: usize, now_ms: i64) -> Vec<Sample> {
        (0..count).map(|_| self.next_point(now_ms)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_ordered_and_bounded() {
        let mut producer = SyntheticProducer::new(Some(7));
        let history = producer.history(500, 1_000_000);
        assert_eq!(history.len(), 500);
        assert_eq!(history[0].timestamp, 1_000_000 - 50_000);
        assert_eq!(history[499].timestamp, 1_000_000 - 100);
        assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(history.iter().all(|s| (0.0..=100.0).contains(&s.value)));
        assert_eq!(history[6].category.as_str(), "B");
    }

    #[test]
    fn walk_moves_in_small_steps() {
        let mut producer = SyntheticProducer::new(Some(42));
        let batch = producer.batch(200, 5);
        let mut previous = 50.0;
        for sample in &batch {
            assert!((sample.value - previous).abs() <= 5.0);
            assert!((0.0..=100.0).contains(&sample.value));
            previous = sample.value;
        }
    }

    #[test]
    fn same_seed_same_series() {
        let a = SyntheticProducer::new(Some(3)).history(50, 0);
        let b = SyntheticProducer::new(Some(3)).history(50, 0);
        assert_eq!(a, b);
    }
}
