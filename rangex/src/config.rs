//! Configuration for dataset generation, benchmarking and text loading
//!
//! Every section has a `Default` and `with_*` builder methods. A whole
//! [`RangexConfig`] can also be read from a JSON file; missing keys fall
//! back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::DelimitedOptions;

/// How generated spans are distributed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanDistribution {
    /// Spans drawn uniformly from `[min_span, max_span]`
    Uniform,
    /// Every span equals `max_span`
    Fixed,
    /// Mostly uniform, with a fraction of much longer ranges
    LongTail {
        /// Probability that a range is drawn from the long tail
        long_fraction: f64,
        /// Upper span limit of the long tail
        long_max_span: f64,
    },
}

/// Configuration for synthetic range generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of ranges to generate
    pub count: usize,
    /// Smallest possible start
    pub domain_start: f64,
    /// Largest possible start (exclusive)
    pub domain_end: f64,
    /// Smallest span
    pub min_span: f64,
    /// Largest span outside the long tail
    pub max_span: f64,
    /// RNG seed; equal seeds give equal datasets
    pub seed: u64,
    /// Span distribution
    pub distribution: SpanDistribution,
}

impl GeneratorConfig {
    /// Create config for `count` ranges with default settings otherwise
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Set the start domain
    pub fn with_domain(mut self, domain_start: f64, domain_end: f64) -> Self {
        self.domain_start = domain_start;
        self.domain_end = domain_end;
        self
    }

    /// Set the span limits
    pub fn with_spans(mut self, min_span: f64, max_span: f64) -> Self {
        self.min_span = min_span;
        self.max_span = max_span;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the span distribution
    pub fn with_distribution(mut self, distribution: SpanDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Check that the settings describe a samplable dataset
    pub fn validate(&self) -> Result<()> {
        if !(self.domain_start < self.domain_end) {
            return Err(Error::Config(format!(
                "empty domain [{}, {})",
                self.domain_start, self.domain_end
            )));
        }
        if !(self.domain_end - self.domain_start < f64::MAX / 2.0) {
            return Err(Error::Config(format!(
                "domain [{}, {}) is too wide to sample",
                self.domain_start, self.domain_end
            )));
        }
        if !(0.0 <= self.min_span && self.min_span <= self.max_span) {
            return Err(Error::Config(format!(
                "span limits must satisfy 0 <= min_span <= max_span, got {} and {}",
                self.min_span, self.max_span
            )));
        }
        if let SpanDistribution::LongTail {
            long_fraction,
            long_max_span,
        } = self.distribution
        {
            if !(0.0..=1.0).contains(&long_fraction) {
                return Err(Error::Config(format!(
                    "long_fraction must lie in [0, 1], got {long_fraction}"
                )));
            }
            if !(long_max_span >= self.max_span) {
                return Err(Error::Config(format!(
                    "long_max_span {long_max_span} is below max_span {}",
                    self.max_span
                )));
            }
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            domain_start: 0.0,
            domain_end: 1_000_000.0,
            min_span: 0.0,
            max_span: 1_000.0,
            seed: 42,
            distribution: SpanDistribution::Uniform,
        }
    }
}

/// Configuration for query benchmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of queries to issue
    pub queries: usize,
    /// Width of each range query
    pub query_width: f64,
    /// Fraction of queries that are point queries
    pub point_fraction: f64,
    /// Run queries on the rayon thread pool
    pub parallel: bool,
    /// Check every result against a linear scan
    pub verify: bool,
    /// RNG seed for query sampling
    pub seed: u64,
}

impl BenchConfig {
    /// Create config issuing `queries` queries
    pub fn with_queries(queries: usize) -> Self {
        Self {
            queries,
            ..Self::default()
        }
    }

    /// Set range query width
    pub fn with_query_width(mut self, query_width: f64) -> Self {
        self.query_width = query_width;
        self
    }

    /// Set the share of point queries
    pub fn with_point_fraction(mut self, point_fraction: f64) -> Self {
        self.point_fraction = point_fraction;
        self
    }

    /// Run queries in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Verify results against a linear scan
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.point_fraction) {
            return Err(Error::Config(format!(
                "point_fraction must lie in [0, 1], got {}",
                self.point_fraction
            )));
        }
        if !(self.query_width >= 0.0) {
            return Err(Error::Config(format!(
                "query_width must be non-negative, got {}",
                self.query_width
            )));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            queries: 10_000,
            query_width: 1_000.0,
            point_fraction: 0.5,
            parallel: false,
            verify: false,
            seed: 7,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangexConfig {
    /// Dataset generation settings
    pub generator: GeneratorConfig,
    /// Benchmark settings
    pub bench: BenchConfig,
    /// Delimited text settings
    pub delimited: DelimitedOptions,
}

impl RangexConfig {
    /// Parse a JSON configuration document
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.generator.validate()?;
        config.bench.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded configuration from {}", path.as_ref().display());
        Self::from_json(&text)
    }
}
