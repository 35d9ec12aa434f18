//! Snapshot sources and the concurrent stores pollers write into
//!
//! The aggregator only reads through [`MetricSource`] and [`HttpCheckSource`].
//! Reads are atomic per key; no cross-key consistency is assumed.

use std::sync::Arc;
use dashmap::DashMap;

use crate::metric::MetricResult;
use crate::types::*;

/// Read access to the latest reading of each host
pub trait MetricSource {
    /// A host with no recorded reading yields `NoSuchMetric`
    fn metric(&self, key: &ProbeKey) -> MetricResult;
}

/// Read access to the HTTP check feed
pub trait HttpCheckSource {
    /// `None` means no check is configured for this host
    fn status(&self, cluster: &str, key: &ProbeKey) -> Option<u16>;
}

impl MetricSource for InstanceMetricResultMap {
    fn metric(&self, key: &ProbeKey) -> MetricResult {
        self.get(key)
            .cloned()
            .unwrap_or_else(MetricResult::no_such_metric)
    }
}

impl HttpCheckSource for ClusterHttpCheckResultMap {
    fn status(&self, cluster: &str, key: &ProbeKey) -> Option<u16> {
        self.get(&HttpCheckKey::new(cluster, key.clone())).copied()
    }
}

/// Concurrent per-host metric store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct InstanceMetricStore {
    results: Arc<DashMap<ProbeKey, MetricResult>>,
}

impl InstanceMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the reading for a host
    pub fn record(&self, key: ProbeKey, result: MetricResult) {
        self.results.insert(key, result);
    }

    pub fn remove(&self, key: &ProbeKey) -> Option<MetricResult> {
        self.results.remove(key).map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Copy of every entry, read key by key
    pub fn snapshot(&self) -> InstanceMetricResultMap {
        self.results
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl MetricSource for InstanceMetricStore {
    fn metric(&self, key: &ProbeKey) -> MetricResult {
        self.results
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(MetricResult::no_such_metric)
    }
}

/// Concurrent (cluster, host) HTTP check store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct HttpCheckStore {
    statuses: Arc<DashMap<HttpCheckKey, u16>>,
}

impl HttpCheckStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, cluster: impl Into<String>, key: ProbeKey, status_code: u16) {
        self.statuses
            .insert(HttpCheckKey::new(cluster, key), status_code);
    }

    pub fn remove(&self, cluster: &str, key: &ProbeKey) -> Option<u16> {
        self.statuses
            .remove(&HttpCheckKey::new(cluster, key.clone()))
            .map(|(_, status)| status)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn snapshot(&self) -> ClusterHttpCheckResultMap {
        self.statuses
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl HttpCheckSource for HttpCheckStore {
    fn status(&self, cluster: &str, key: &ProbeKey) -> Option<u16> {
        self.statuses
            .get(&HttpCheckKey::new(cluster, key.clone()))
            .map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricError;

    #[test]
    fn test_missing_metric_is_no_such_metric() {
        let map = InstanceMetricResultMap::new();
        assert_eq!(
            map.metric(&ProbeKey::new("10.0.0.1", 3306)),
            MetricResult::no_such_metric()
        );

        let store = InstanceMetricStore::new();
        assert_eq!(
            store.metric(&ProbeKey::new("10.0.0.1", 3306)).get(),
            Err(MetricError::NoSuchMetric)
        );
    }

    #[test]
    fn test_metric_store_clones_share_state() {
        let store = InstanceMetricStore::new();
        let poller_handle = store.clone();
        let key = ProbeKey::new("10.0.0.1", 3306);

        poller_handle.record(key.clone(), MetricResult::value(0.4));
        assert_eq!(store.metric(&key), MetricResult::value(0.4));
        assert_eq!(store.len(), 1);

        poller_handle.record(key.clone(), MetricResult::failure(MetricError::Timeout));
        assert!(store.metric(&key).is_failure());

        assert_eq!(
            store.remove(&key),
            Some(MetricResult::failure(MetricError::Timeout))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_metric_snapshot_is_detached() {
        let store = InstanceMetricStore::new();
        let key = ProbeKey::new("10.0.0.1", 3306);
        store.record(key.clone(), MetricResult::value(1.0));

        let snapshot = store.snapshot();
        store.record(key.clone(), MetricResult::value(2.0));

        assert_eq!(snapshot.metric(&key), MetricResult::value(1.0));
        assert_eq!(store.metric(&key), MetricResult::value(2.0));
    }

    #[test]
    fn test_http_check_store_scoped_by_cluster() {
        let store = HttpCheckStore::new();
        let key = ProbeKey::new("10.0.0.1", 3306);
        store.record("c0", key.clone(), 404);

        assert_eq!(store.status("c0", &key), Some(404));
        assert_eq!(store.status("c1", &key), None);
        assert_eq!(store.snapshot().status("c0", &key), Some(404));

        assert_eq!(store.remove("c0", &key), Some(404));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let store = InstanceMetricStore::new();
        let handles: Vec<_> = (0..8u16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for round in 0..100 {
                        store.record(
                            ProbeKey::new(format!("10.0.0.{}", i), 3306),
                            MetricResult::value(round as f64),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        assert_eq!(
            store.metric(&ProbeKey::new("10.0.0.3", 3306)),
            MetricResult::value(99.0)
        );
    }
}
