//! Severity ranking
//!
//! A failure outranks every value; among values, larger is worse.

use std::cmp::Ordering;

use crate::metric::MetricResult;
use crate::types::ProbeKey;

/// One eligible host's reading within a single aggregation call
#[derive(Debug, Clone, PartialEq)]
pub struct HostReading<'p> {
    pub key: &'p ProbeKey,
    pub result: MetricResult,
}

impl MetricResult {
    /// `Greater` means `self` is more severe than `other`.
    ///
    /// Failures and non-finite values rank together above every finite
    /// value and compare equal among themselves.
    pub fn severity_cmp(&self, other: &Self) -> Ordering {
        match (self.finite_value(), other.finite_value()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.total_cmp(&b),
        }
    }
}

/// Sort most severe first. Ties are broken by host key so repeated calls
/// over the same inputs pick the same entry.
pub fn rank_by_severity(readings: &mut [HostReading<'_>]) {
    readings.sort_by(|a, b| {
        b.result
            .severity_cmp(&a.result)
            .then_with(|| a.key.cmp(b.key))
    });
}
