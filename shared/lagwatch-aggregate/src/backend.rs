//! Load balancer backend view of a host
//!
//! A peer signal to the HTTP check: status only, no aggregation.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackendHostStatus {
    Down,
    NoLb,
    Up,
    NoCheck,
    Unknown,
}

impl BackendHostStatus {
    /// Map the balancer's status string; anything unrecognised is `Unknown`
    pub fn parse(status: &str) -> Self {
        match status {
            "DOWN" => Self::Down,
            "NOLB" => Self::NoLb,
            "UP" => Self::Up,
            "no check" => Self::NoCheck,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "DOWN",
            Self::NoLb => "NOLB",
            Self::Up => "UP",
            Self::NoCheck => "no check",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the balancer is routing traffic to the host
    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Up | Self::NoCheck)
    }
}

impl FromStr for BackendHostStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for BackendHostStatus {
    fn from(status: String) -> Self {
        Self::parse(&status)
    }
}

impl From<BackendHostStatus> for String {
    fn from(status: BackendHostStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BackendHostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend member as reported by the load balancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHost {
    pub hostname: String,
    pub status: BackendHostStatus,
}

impl BackendHost {
    pub fn new(hostname: impl Into<String>, status: BackendHostStatus) -> Self {
        Self {
            hostname: hostname.into(),
            status,
        }
    }
}
