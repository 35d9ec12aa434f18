//! Probe identity types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::metric::MetricResult;

/// Identifies a monitored host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProbeKey {
    pub hostname: String,
    pub port: u16,
}

impl ProbeKey {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }
}

impl fmt::Display for ProbeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// A monitored host within a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub key: ProbeKey,
    /// Query the poller runs against this host; unused by aggregation
    #[serde(default)]
    pub metric_query: Option<String>,
}

impl Probe {
    pub fn new(key: ProbeKey) -> Self {
        Self {
            key,
            metric_query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.metric_query = Some(query.into());
        self
    }
}

/// Probes of one cluster, keyed by host identity
pub type Probes = HashMap<ProbeKey, Probe>;

/// Build a probe set from bare keys
pub fn probes_from_keys<I>(keys: I) -> Probes
where
    I: IntoIterator<Item = ProbeKey>,
{
    keys.into_iter()
        .map(|key| (key.clone(), Probe::new(key)))
        .collect()
}

/// Composite key of the HTTP check feed: one host as seen from one cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpCheckKey {
    pub cluster: String,
    pub probe: ProbeKey,
}

impl HttpCheckKey {
    pub fn new(cluster: impl Into<String>, probe: ProbeKey) -> Self {
        Self {
            cluster: cluster.into(),
            probe,
        }
    }
}

/// Latest reading per host
pub type InstanceMetricResultMap = HashMap<ProbeKey, MetricResult>;

/// Latest HTTP check status code per (cluster, host)
pub type ClusterHttpCheckResultMap = HashMap<HttpCheckKey, u16>;
