//! Cluster Monitor
//!
//! Control loop that aggregates every registered cluster once per tick and
//! keeps the latest verdict for admission decisions. It neither polls hosts
//! nor throttles traffic.

use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use lagwatch_core::AggregationConfig;
use lagwatch_telemetry::{Counter, Gauge, Histogram};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::aggregator::ClusterAggregator;
use crate::gate::HealthCheckGate;
use crate::metric::MetricResult;
use crate::store::{HttpCheckStore, InstanceMetricStore};
use crate::suppressor::AggregationParams;
use crate::types::Probes;

/// Static description of one cluster
#[derive(Debug, Clone)]
pub struct ClusterSettings {
    pub name: String,
    pub probes: Probes,
    pub params: AggregationParams,
}

impl ClusterSettings {
    pub fn new(name: impl Into<String>, probes: Probes, params: AggregationParams) -> Self {
        Self {
            name: name.into(),
            probes,
            params,
        }
    }
}

/// Latest aggregate of a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetric {
    pub cluster: String,
    pub result: MetricResult,
    pub aggregated_at: DateTime<Utc>,
}

pub struct ClusterMonitor {
    aggregator: ClusterAggregator,
    tick_interval: Duration,
    clusters: Arc<DashMap<String, ClusterSettings>>,
    metrics: InstanceMetricStore,
    http_checks: HttpCheckStore,
    latest: Arc<DashMap<String, ClusterMetric>>,
    aggregations: Counter,
    failures: Counter,
    cluster_count: Gauge,
    worst_metric: Histogram,
}

impl ClusterMonitor {
    pub fn new(
        metrics: InstanceMetricStore,
        http_checks: HttpCheckStore,
        config: &AggregationConfig,
    ) -> Self {
        Self {
            aggregator: ClusterAggregator::new(HealthCheckGate::new(config.http_success_code)),
            tick_interval: config.tick_interval(),
            clusters: Arc::new(DashMap::new()),
            metrics,
            http_checks,
            latest: Arc::new(DashMap::new()),
            aggregations: Counter::new("aggregations_total"),
            failures: Counter::new("aggregation_failures_total"),
            cluster_count: Gauge::new("clusters"),
            worst_metric: Histogram::new("worst_metric"),
        }
    }

    /// Add or replace a cluster
    pub fn register(&self, settings: ClusterSettings) {
        info!(
            cluster = %settings.name,
            probes = settings.probes.len(),
            ignore_hosts_count = settings.params.ignore_hosts_count,
            ignore_hosts_threshold = settings.params.ignore_hosts_threshold,
            "Registered cluster"
        );
        self.clusters.insert(settings.name.clone(), settings);
        self.cluster_count.set(self.clusters.len() as f64);
    }

    pub fn deregister(&self, cluster: &str) -> Option<ClusterSettings> {
        let removed = self.clusters.remove(cluster).map(|(_, settings)| settings);
        self.latest.remove(cluster);
        self.cluster_count.set(self.clusters.len() as f64);
        removed
    }

    /// Aggregate every registered cluster once; returns how many were aggregated
    pub fn tick(&self) -> usize {
        let mut aggregated = 0;

        for entry in self.clusters.iter() {
            let settings = entry.value();
            let result = self.aggregator.aggregate(
                &settings.name,
                &settings.probes,
                &self.metrics,
                &self.http_checks,
                settings.params,
            );

            self.aggregations.inc();
            match result.get() {
                Ok(value) => {
                    self.worst_metric.record(value);
                    debug!(cluster = %settings.name, value, "Cluster metric updated");
                }
                Err(error) => {
                    self.failures.inc();
                    warn!(cluster = %settings.name, %error, "Cluster metric unavailable");
                }
            }

            self.latest.insert(
                settings.name.clone(),
                ClusterMetric {
                    cluster: settings.name.clone(),
                    result,
                    aggregated_at: Utc::now(),
                },
            );
            aggregated += 1;
        }

        aggregated
    }

    /// Tick until `shutdown` turns true or its sender is dropped
    pub async fn start(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_ms = self.tick_interval.as_millis() as u64, "Cluster monitor started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            aggregations = self.aggregations.get(),
            failures = self.failures.get(),
            "Cluster monitor stopped"
        );
    }

    pub fn latest(&self, cluster: &str) -> Option<ClusterMetric> {
        self.latest.get(cluster).map(|entry| entry.value().clone())
    }

    pub fn snapshot(&self) -> Vec<ClusterMetric> {
        self.latest.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn aggregation_count(&self) -> u64 {
        self.aggregations.get()
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.get()
    }

    pub fn cluster_count(&self) -> u64 {
        self.cluster_count.get() as u64
    }

    /// p-th percentile of recent successful cluster values
    pub fn worst_metric_percentile(&self, p: f64) -> Option<f64> {
        self.worst_metric.percentile(p)
    }
}
