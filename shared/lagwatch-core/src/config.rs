//! Configuration management for the aggregation service

use crate::error::{LagwatchError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Status code an HTTP health check must report for a host to be eligible
pub const DEFAULT_HTTP_SUCCESS_CODE: u16 = 200;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregationConfig {
    pub ignore_hosts_count: usize,
    pub ignore_hosts_threshold: f64,
    pub http_success_code: u16,
    pub tick_interval_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            ignore_hosts_count: 0,
            ignore_hosts_threshold: 0.0,
            http_success_code: DEFAULT_HTTP_SUCCESS_CODE,
            tick_interval_ms: 1000,
        }
    }
}

impl AggregationConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            ignore_hosts_count: parse_var(
                &lookup,
                "LAGWATCH_IGNORE_HOSTS_COUNT",
                defaults.ignore_hosts_count,
            )?,
            ignore_hosts_threshold: parse_var(
                &lookup,
                "LAGWATCH_IGNORE_HOSTS_THRESHOLD",
                defaults.ignore_hosts_threshold,
            )?,
            http_success_code: parse_var(
                &lookup,
                "LAGWATCH_HTTP_SUCCESS_CODE",
                defaults.http_success_code,
            )?,
            tick_interval_ms: parse_var(
                &lookup,
                "LAGWATCH_TICK_INTERVAL_MS",
                defaults.tick_interval_ms,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.ignore_hosts_threshold.is_finite() || self.ignore_hosts_threshold < 0.0 {
            return Err(LagwatchError::Config(format!(
                "Invalid LAGWATCH_IGNORE_HOSTS_THRESHOLD: {} (must be finite and >= 0)",
                self.ignore_hosts_threshold
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(LagwatchError::Config(
                "Invalid LAGWATCH_TICK_INTERVAL_MS: must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| LagwatchError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AggregationConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AggregationConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_overrides() {
        let config = AggregationConfig::from_lookup(lookup_from(&[
            ("LAGWATCH_IGNORE_HOSTS_COUNT", "2"),
            ("LAGWATCH_IGNORE_HOSTS_THRESHOLD", "1.5"),
            ("LAGWATCH_HTTP_SUCCESS_CODE", "204"),
            ("LAGWATCH_TICK_INTERVAL_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.ignore_hosts_count, 2);
        assert_eq!(config.ignore_hosts_threshold, 1.5);
        assert_eq!(config.http_success_code, 204);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_unparseable_value_is_config_error() {
        let err = AggregationConfig::from_lookup(lookup_from(&[(
            "LAGWATCH_IGNORE_HOSTS_COUNT",
            "-1",
        )]))
        .unwrap_err();
        assert!(matches!(err, LagwatchError::Config(ref msg) if msg.contains("LAGWATCH_IGNORE_HOSTS_COUNT")));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = AggregationConfig::from_lookup(lookup_from(&[(
            "LAGWATCH_IGNORE_HOSTS_THRESHOLD",
            "-0.5",
        )]))
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        assert!(AggregationConfig::from_lookup(lookup_from(&[(
            "LAGWATCH_TICK_INTERVAL_MS",
            "0"
        )]))
        .is_err());
    }
}
