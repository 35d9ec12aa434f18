//! Outlier suppression
//!
//! Lets an operator disregard up to N of the worst hosts as noise. Only a
//! contiguous block at the most severe end of the ranking is exempted, and
//! at least one host always survives.

use lagwatch_core::{AggregationConfig, LagwatchError, Result};

use crate::metric::MetricResult;
use crate::severity::HostReading;

/// Per-call outlier tolerance
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregationParams {
    /// Maximum number of the most severe eligible hosts to exempt
    pub ignore_hosts_count: usize,
    /// A value is exemptible only when strictly above this
    pub ignore_hosts_threshold: f64,
}

impl AggregationParams {
    pub fn new(ignore_hosts_count: usize, ignore_hosts_threshold: f64) -> Result<Self> {
        if !ignore_hosts_threshold.is_finite() || ignore_hosts_threshold < 0.0 {
            return Err(LagwatchError::Validation(format!(
                "ignore_hosts_threshold must be finite and >= 0, got {}",
                ignore_hosts_threshold
            )));
        }
        Ok(Self {
            ignore_hosts_count,
            ignore_hosts_threshold,
        })
    }

    pub fn from_config(config: &AggregationConfig) -> Result<Self> {
        Self::new(config.ignore_hosts_count, config.ignore_hosts_threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierSuppressor {
    params: AggregationParams,
}

impl OutlierSuppressor {
    pub fn new(params: AggregationParams) -> Self {
        Self { params }
    }

    /// Failures and non-finite values carry no usable magnitude and are
    /// always exemptible.
    pub fn is_exemptible(&self, result: &MetricResult) -> bool {
        match result.finite_value() {
            None => true,
            Some(value) => value > self.params.ignore_hosts_threshold,
        }
    }

    /// Number of leading entries of `ranked` (most severe first) to exempt.
    ///
    /// The scan stops at the first non-exemptible entry; never returns more
    /// than `ranked.len() - 1`.
    pub fn exempt_count(&self, ranked: &[HostReading<'_>]) -> usize {
        let budget = self
            .params
            .ignore_hosts_count
            .min(ranked.len().saturating_sub(1));

        ranked
            .iter()
            .take(budget)
            .take_while(|reading| self.is_exemptible(&reading.result))
            .count()
    }

    /// The entries that remain after exemption, still ranked.
    pub fn suppress<'a, 'p>(&self, ranked: &'a [HostReading<'p>]) -> &'a [HostReading<'p>] {
        &ranked[self.exempt_count(ranked)..]
    }
}
