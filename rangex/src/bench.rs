//! Query throughput harness
//!
//! [`QueryBench`] samples a reproducible mix of range and point queries over
//! an index's covered domain, runs them sequentially or on the rayon pool
//! and optionally checks every answer against a linear scan.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rangex_core::{Bound, RangeEntry, RangeIndex};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::BenchConfig;
use crate::element::StoredBound;
use crate::generate::sample_in;

/// A single benchmark query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query<T> {
    /// Overlap query over `[from, to]`
    Range(T, T),
    /// Containment query at a point
    Point(T),
}

impl<T: Bound> Query<T> {
    /// Run the query against an index
    pub fn execute<'a, V>(&self, index: &'a RangeIndex<T, V>) -> Vec<&'a RangeEntry<T, V>> {
        match *self {
            Query::Range(from, to) => index.query_range(from, to),
            Query::Point(point) => index.query_point(point),
        }
    }

    /// Answer the query by scanning every entry
    pub fn execute_naive<'a, V>(&self, entries: &'a [RangeEntry<T, V>]) -> Vec<&'a RangeEntry<T, V>> {
        match *self {
            Query::Range(from, to) => naive_range(entries, from, to),
            Query::Point(point) => naive_point(entries, point),
        }
    }
}

/// All entries overlapping `[from, to]`, by linear scan
pub fn naive_range<T: Bound, V>(entries: &[RangeEntry<T, V>], from: T, to: T) -> Vec<&RangeEntry<T, V>> {
    entries
        .iter()
        .filter(|entry| entry.overlaps_interval(from, to))
        .collect()
}

/// All entries containing `point`, by linear scan
pub fn naive_point<T: Bound, V>(entries: &[RangeEntry<T, V>], point: T) -> Vec<&RangeEntry<T, V>> {
    entries.iter().filter(|entry| entry.contains(point)).collect()
}

/// Run many overlap queries on the rayon pool
pub fn par_query_ranges<'a, T, V>(
    index: &'a RangeIndex<T, V>,
    windows: &[(T, T)],
) -> Vec<Vec<&'a RangeEntry<T, V>>>
where
    T: Bound + Send + Sync,
    V: Sync,
{
    windows
        .par_iter()
        .map(|&(from, to)| index.query_range(from, to))
        .collect()
}

/// Build an index, returning it with the elapsed build time
pub fn time_build<T: Bound, V>(entries: Vec<RangeEntry<T, V>>) -> (RangeIndex<T, V>, Duration) {
    let count = entries.len();
    let started = Instant::now();
    let index = RangeIndex::build(entries);
    let elapsed = started.elapsed();
    debug!("built index over {count} entries in {elapsed:.2?}");
    (index, elapsed)
}

/// Summary of a benchmark run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// Entries in the index
    pub entries: usize,
    /// Pruning bound of the index
    pub max_span: f64,
    /// Queries issued
    pub queries: usize,
    /// Of which point queries
    pub point_queries: usize,
    /// Sum of result sizes
    pub total_hits: u64,
    /// Wall time of the query phase in seconds
    pub elapsed_secs: f64,
    /// Throughput
    pub queries_per_sec: f64,
    /// Whether queries ran on the rayon pool
    pub parallel: bool,
    /// Whether results were checked against a linear scan
    pub verified: bool,
    /// Queries whose result differed from the linear scan
    pub mismatches: usize,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entries:        {}", self.entries)?;
        writeln!(f, "max span:       {}", self.max_span)?;
        writeln!(
            f,
            "queries:        {} ({} point, {} range)",
            self.queries,
            self.point_queries,
            self.queries - self.point_queries
        )?;
        writeln!(f, "total hits:     {}", self.total_hits)?;
        writeln!(
            f,
            "elapsed:        {:.2?}{}",
            Duration::from_secs_f64(self.elapsed_secs),
            if self.parallel { " (parallel)" } else { "" }
        )?;
        write!(f, "throughput:     {:.0} queries/s", self.queries_per_sec)?;
        if self.verified {
            write!(f, "\nmismatches:     {}", self.mismatches)?;
        }
        Ok(())
    }
}

/// Reproducible query workload over an index
pub struct QueryBench<'a, T, V> {
    index: &'a RangeIndex<T, V>,
    config: BenchConfig,
    queries: Vec<Query<T>>,
}

impl<'a, T: StoredBound, V: Sync> QueryBench<'a, T, V> {
    /// Sample the workload described by `config`
    ///
    /// Query positions are drawn between the index's lower and upper bound.
    pub fn new(index: &'a RangeIndex<T, V>, config: BenchConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let low = index.lower_bound().to_f64();
        let high = index.upper_bound().to_f64();
        let (low, high) = if high < low { (high, low) } else { (low, high) };
        let point_fraction = config.point_fraction.clamp(0.0, 1.0);

        let queries = (0..config.queries)
            .map(|_| {
                let from = sample_in(&mut rng, low, high);
                if rng.gen_bool(point_fraction) {
                    Query::Point(T::from_f64(from))
                } else {
                    Query::Range(T::from_f64(from), T::from_f64(from + config.query_width))
                }
            })
            .collect();

        Self {
            index,
            config,
            queries,
        }
    }

    /// Sampled queries
    pub fn queries(&self) -> &[Query<T>] {
        &self.queries
    }

    /// Run the workload and collect statistics
    pub fn run(&self) -> BenchReport {
        let index = self.index;
        let started = Instant::now();
        let total_hits: u64 = if self.config.parallel {
            self.queries
                .par_iter()
                .map(|query| query.execute(index).len() as u64)
                .sum()
        } else {
            self.queries
                .iter()
                .map(|query| query.execute(index).len() as u64)
                .sum()
        };
        let elapsed = started.elapsed();

        let mismatches = if self.config.verify {
            self.verify()
        } else {
            0
        };
        if mismatches > 0 {
            warn!("{mismatches} queries disagreed with the linear scan");
        }

        let elapsed_secs = elapsed.as_secs_f64();
        let queries_per_sec = if elapsed_secs > 0.0 {
            self.queries.len() as f64 / elapsed_secs
        } else {
            0.0
        };
        info!(
            "{} queries over {} entries in {elapsed:.2?}",
            self.queries.len(),
            index.count()
        );

        BenchReport {
            entries: index.count(),
            max_span: index.max_span().to_f64(),
            queries: self.queries.len(),
            point_queries: self
                .queries
                .iter()
                .filter(|query| matches!(query, Query::Point(_)))
                .count(),
            total_hits,
            elapsed_secs,
            queries_per_sec,
            parallel: self.config.parallel,
            verified: self.config.verify,
            mismatches,
        }
    }

    /// Count queries whose indexed answer differs from a linear scan
    ///
    /// Both answers come out in storage order, so they are compared
    /// element by element by address.
    fn verify(&self) -> usize {
        let entries = self.index.as_slice();
        self.queries
            .par_iter()
            .filter(|query| {
                let indexed = query.execute(self.index);
                let naive = query.execute_naive(entries);
                indexed.len() != naive.len()
                    || indexed
                        .iter()
                        .zip(&naive)
                        .any(|(a, b)| !std::ptr::eq(*a, *b))
            })
            .count()
    }
}
