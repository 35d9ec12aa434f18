//! HTTP health-check gate
//!
//! Decides whether a host may contribute a reading at all. Excluded hosts
//! are dropped before ranking and never consume ignore budget.

use crate::store::HttpCheckSource;
use crate::types::ProbeKey;

pub const HTTP_OK: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckGate {
    success_code: u16,
}

impl Default for HealthCheckGate {
    fn default() -> Self {
        Self::new(HTTP_OK)
    }
}

impl HealthCheckGate {
    pub fn new(success_code: u16) -> Self {
        Self { success_code }
    }

    pub fn success_code(&self) -> u16 {
        self.success_code
    }

    /// A host with no configured check passes.
    pub fn is_eligible<H>(&self, cluster: &str, key: &ProbeKey, checks: &H) -> bool
    where
        H: HttpCheckSource + ?Sized,
    {
        match checks.status(cluster, key) {
            None => true,
            Some(status) => status == self.success_code,
        }
    }
}
