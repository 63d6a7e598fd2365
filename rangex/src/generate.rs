//! Synthetic range datasets
//!
//! Generation is driven by [`GeneratorConfig`] and is fully deterministic
//! for a given seed. Samples are drawn as `f64` and converted to the bound
//! type, so integer datasets are truncated towards zero.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rangex_core::RangeEntry;

use crate::config::{GeneratorConfig, SpanDistribution};
use crate::element::StoredBound;
use crate::error::Result;

/// Seed offset separating query sampling from dataset sampling
const QUERY_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Generate `config.count` unsorted ranges whose values are their ordinals
pub fn generate<T: StoredBound>(config: &GeneratorConfig) -> Result<Vec<RangeEntry<T, u64>>> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let entries: Vec<RangeEntry<T, u64>> = (0..config.count as u64)
        .map(|ordinal| {
            let start = rng.gen_range(config.domain_start..config.domain_end);
            let span = sample_span(&mut rng, config);
            RangeEntry::new(T::from_f64(start), T::from_f64(start + span), ordinal)
        })
        .collect();

    debug!(
        "generated {} {} ranges with seed {}",
        entries.len(),
        T::data_type(),
        config.seed
    );
    Ok(entries)
}

fn sample_span<R: Rng>(rng: &mut R, config: &GeneratorConfig) -> f64 {
    let uniform = |rng: &mut R| {
        if config.min_span < config.max_span {
            rng.gen_range(config.min_span..=config.max_span)
        } else {
            config.max_span
        }
    };

    match config.distribution {
        SpanDistribution::Uniform => uniform(rng),
        SpanDistribution::Fixed => config.max_span,
        SpanDistribution::LongTail {
            long_fraction,
            long_max_span,
        } => {
            if rng.gen_bool(long_fraction) && config.max_span < long_max_span {
                rng.gen_range(config.max_span..=long_max_span)
            } else {
                uniform(rng)
            }
        }
    }
}

/// Sample `count` query windows `[from, from + width]` over the generator's domain
pub fn random_queries<T: StoredBound>(
    config: &GeneratorConfig,
    count: usize,
    width: f64,
) -> Vec<(T, T)> {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(QUERY_SEED_OFFSET));
    sample_windows(&mut rng, config.domain_start, config.domain_end, count, width)
}

/// Sample `count` windows of `width` whose start lies in `[low, high]`
///
/// The bounds are swapped when given in reverse order.
pub fn sample_windows<T: StoredBound, R: Rng>(
    rng: &mut R,
    low: f64,
    high: f64,
    count: usize,
    width: f64,
) -> Vec<(T, T)> {
    let (low, high) = if high < low { (high, low) } else { (low, high) };
    (0..count)
        .map(|_| {
            let from = sample_in(rng, low, high);
            (T::from_f64(from), T::from_f64(from + width))
        })
        .collect()
}

/// Sample a single point in `[low, high]`
///
/// Infinite bounds are clamped to the finite range. Intervals too wide for
/// `Uniform` to scale are sampled by interpolating between the bounds.
pub(crate) fn sample_in<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    let low = low.max(f64::MIN);
    let high = high.min(f64::MAX);
    if !(low < high) {
        return low;
    }
    if high - low < f64::MAX / 2.0 {
        rng.gen_range(low..=high)
    } else {
        let t: f64 = rng.gen();
        (low * (1.0 - t) + high * t).clamp(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rangex_core::RangeIndex;

    #[test]
    fn test_generate_is_deterministic() {
        let config = GeneratorConfig::with_count(500).with_seed(11);
        let a = generate::<f64>(&config).unwrap();
        let b = generate::<f64>(&config).unwrap();
        assert_eq!(a, b);

        let c = generate::<f64>(&config.clone().with_seed(12)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_ranges_respect_limits() {
        let config = GeneratorConfig::with_count(2_000)
            .with_domain(-1_000.0, 1_000.0)
            .with_spans(5.0, 50.0);
        let entries = generate::<i64>(&config).unwrap();

        assert_eq!(entries.len(), 2_000);
        for (ordinal, entry) in entries.iter().enumerate() {
            assert_eq!(entry.value, ordinal as u64);
            assert!(entry.is_well_formed());
            assert!((-1_000..=1_000).contains(&entry.start));
            // Truncation can shave one unit off either side
            assert!(entry.span() <= 51, "{entry:?}");
        }

        let index = RangeIndex::build(entries);
        assert!(index.max_span() <= 51);
    }

    #[test]
    fn test_fixed_spans() {
        let config = GeneratorConfig::with_count(100)
            .with_domain(0.0, 1_000.0)
            .with_spans(0.0, 8.0)
            .with_distribution(SpanDistribution::Fixed);
        let entries = generate::<f32>(&config).unwrap();
        assert!(entries.iter().all(|entry| (entry.span() - 8.0).abs() < 0.1));
    }

    #[test]
    fn test_long_tail_produces_long_ranges() {
        let config = GeneratorConfig::with_count(1_000)
            .with_spans(0.0, 10.0)
            .with_distribution(SpanDistribution::LongTail {
                long_fraction: 0.2,
                long_max_span: 10_000.0,
            });
        let entries = generate::<f64>(&config).unwrap();

        let long = entries.iter().filter(|entry| entry.span() > 10.0).count();
        assert!(long > 100 && long < 300, "long ranges: {long}");
        assert!(entries.iter().all(|entry| entry.span() <= 10_000.0));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GeneratorConfig::with_count(10).with_domain(1.0, 0.0);
        assert!(matches!(generate::<u32>(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_random_queries() {
        let config = GeneratorConfig::with_count(0).with_domain(0.0, 100.0);
        let queries = random_queries::<f64>(&config, 50, 10.0);

        assert_eq!(queries.len(), 50);
        for (from, to) in &queries {
            assert!((0.0..=100.0).contains(from));
            assert!((to - from - 10.0).abs() < 1e-9);
        }
        assert_eq!(queries, random_queries::<f64>(&config, 50, 10.0));
    }

    #[test]
    fn test_sample_in_extreme_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1_000 {
            let x = sample_in(&mut rng, -f64::MAX, f64::MAX);
            assert!(x.is_finite());
        }
        let x = sample_in(&mut rng, f64::NEG_INFINITY, f64::INFINITY);
        assert!(x.is_finite());
        let x = sample_in(&mut rng, f64::MAX / 4.0, f64::MAX);
        assert!((f64::MAX / 4.0..=f64::MAX).contains(&x));
        assert_eq!(sample_in(&mut rng, f64::MAX, f64::INFINITY), f64::MAX);
    }

    #[test]
    fn test_sample_windows_degenerate_domain() {
        let mut rng = StdRng::seed_from_u64(1);
        let windows = sample_windows::<u32, _>(&mut rng, 7.0, 7.0, 3, 0.0);
        assert_eq!(windows, vec![(7, 7); 3]);
    }
}
