//! Cluster metric aggregation
//!
//! Produces one worst-case reading per cluster from a snapshot of host
//! readings and HTTP checks. Pure: reads its sources, mutates nothing.

use tracing::{debug, trace};

use crate::gate::HealthCheckGate;
use crate::metric::MetricResult;
use crate::severity::{rank_by_severity, HostReading};
use crate::store::{HttpCheckSource, MetricSource};
use crate::suppressor::{AggregationParams, OutlierSuppressor};
use crate::types::Probes;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterAggregator {
    gate: HealthCheckGate,
}

impl ClusterAggregator {
    pub fn new(gate: HealthCheckGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> HealthCheckGate {
        self.gate
    }

    /// Worst reading among eligible, non-exempted hosts.
    ///
    /// Fails with `NoSuchMetric` when no host passes the health-check gate.
    /// An unexempted failure is returned as-is, so "unknown" is never
    /// reported as healthy. A non-finite reading counts as a `NotFinite`
    /// failure; a successful result is always finite.
    pub fn aggregate<M, H>(
        &self,
        cluster: &str,
        probes: &Probes,
        metrics: &M,
        http_checks: &H,
        params: AggregationParams,
    ) -> MetricResult
    where
        M: MetricSource + ?Sized,
        H: HttpCheckSource + ?Sized,
    {
        let mut readings: Vec<HostReading<'_>> = probes
            .values()
            .filter(|probe| self.gate.is_eligible(cluster, &probe.key, http_checks))
            .map(|probe| HostReading {
                key: &probe.key,
                result: metrics.metric(&probe.key).into_finite(),
            })
            .collect();

        if readings.is_empty() {
            debug!(cluster, probes = probes.len(), "No eligible hosts in cluster");
            return MetricResult::no_such_metric();
        }

        rank_by_severity(&mut readings);

        let suppressor = OutlierSuppressor::new(params);
        let exempted = suppressor.exempt_count(&readings);
        for reading in &readings[..exempted] {
            trace!(cluster, host = %reading.key, result = ?reading.result, "Exempted outlier");
        }

        let worst = &readings[exempted];
        debug!(
            cluster,
            eligible = readings.len(),
            exempted,
            host = %worst.key,
            result = ?worst.result,
            "Aggregated cluster metric"
        );

        worst.result.clone()
    }
}

/// Aggregate with the default health-check gate (HTTP 200 passes).
///
/// The parameters are not validated: a NaN threshold makes every finite
/// value non-exemptible. Use [`AggregationParams::new`] with
/// [`ClusterAggregator::aggregate`] to reject bad input.
pub fn aggregate<M, H>(
    cluster: &str,
    probes: &Probes,
    metrics: &M,
    http_checks: &H,
    ignore_hosts_count: usize,
    ignore_hosts_threshold: f64,
) -> MetricResult
where
    M: MetricSource + ?Sized,
    H: HttpCheckSource + ?Sized,
{
    debug_assert!(
        !ignore_hosts_threshold.is_nan(),
        "ignore_hosts_threshold must not be NaN"
    );
    let params = AggregationParams {
        ignore_hosts_count,
        ignore_hosts_threshold,
    };
    ClusterAggregator::default().aggregate(cluster, probes, metrics, http_checks, params)
}
