//! Cluster Metric Aggregation
//!
//! Reduces per-host replication-lag readings to a single worst-case value
//! per cluster, honoring HTTP health-check exclusion and operator-tuned
//! outlier suppression. Results feed write-admission decisions.

pub mod aggregator;
pub mod backend;
pub mod gate;
pub mod metric;
pub mod monitor;
pub mod severity;
pub mod store;
pub mod suppressor;
pub mod types;

pub use aggregator::{aggregate, ClusterAggregator};
pub use backend::{BackendHost, BackendHostStatus};
pub use gate::{HealthCheckGate, HTTP_OK};
pub use metric::{MetricError, MetricResult};
pub use monitor::{ClusterMetric, ClusterMonitor, ClusterSettings};
pub use severity::{rank_by_severity, HostReading};
pub use store::{HttpCheckSource, HttpCheckStore, InstanceMetricStore, MetricSource};
pub use suppressor::{AggregationParams, OutlierSuppressor};
pub use types::*;
