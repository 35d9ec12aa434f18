//! Control loop under the service's log subscriber

use lagwatch_aggregate::*;
use lagwatch_core::AggregationConfig;
use lagwatch_telemetry::{init_tracing, TelemetryConfig};

#[test]
fn test_monitor_runs_with_configured_logging() {
    let telemetry = TelemetryConfig::from_lookup(|key| match key {
        "SERVICE_NAME" => Some("lag-controller".to_string()),
        "LOG_LEVEL" => Some("lagwatch_aggregate=trace,info".to_string()),
        "JSON_LOGS" => Some("true".to_string()),
        _ => None,
    });
    assert_eq!(telemetry.log_level, "lagwatch_aggregate=trace,info");
    init_tracing(&telemetry.service_name, &telemetry).unwrap();

    let config = AggregationConfig::from_lookup(|key| match key {
        "LAGWATCH_IGNORE_HOSTS_COUNT" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();

    let metrics = InstanceMetricStore::new();
    let checks = HttpCheckStore::new();
    let keys: Vec<ProbeKey> = (1..=3).map(|i| ProbeKey::new(format!("10.0.0.{}", i), 3306)).collect();
    metrics.record(keys[0].clone(), MetricResult::value(0.4));
    metrics.record(keys[1].clone(), MetricResult::value(f64::NAN));
    metrics.record(keys[2].clone(), MetricResult::value(0.9));

    let monitor = ClusterMonitor::new(metrics, checks, &config);
    monitor.register(ClusterSettings::new(
        "c0",
        probes_from_keys(keys),
        AggregationParams::from_config(&config).unwrap(),
    ));

    assert_eq!(monitor.tick(), 1);
    assert_eq!(monitor.latest("c0").unwrap().result, MetricResult::value(0.9));
    assert_eq!(monitor.failure_count(), 0);

    // A second subscriber cannot be installed in the same process.
    assert!(init_tracing("lag-controller", &telemetry).is_err());
}
