//! # Health
//!
//! Liveness report for monitors, and a host load snapshot for the admin
//! dashboard.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sysinfo::System;

/// CPU utilisation above this percentage is reported as a warning
pub const CPU_WARNING_THRESHOLD: f32 = 80.0;

static SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| Mutex::new(System::new()));

/// Public liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn current() -> Self {
        HealthReport {
            status: "healthy".to_string(),
            message: "The server is up and running.".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Coarse host status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Good,
    Warning,
}

impl HealthStatus {
    pub fn from_cpu_utilization(percent: f32) -> Self {
        if percent > CPU_WARNING_THRESHOLD {
            HealthStatus::Warning
        } else {
            HealthStatus::Good
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Good => write!(f, "Good"),
            HealthStatus::Warning => write!(f, "Warning"),
        }
    }
}

/// Host load snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    /// Logical CPU count
    pub cpu_cores: usize,
    /// Global CPU utilisation, percent
    pub cpu_utilization: f32,
    pub status: HealthStatus,
}

impl SystemHealth {
    pub fn from_readings(cpu_cores: usize, cpu_utilization: f32) -> Self {
        SystemHealth {
            cpu_cores,
            cpu_utilization,
            status: HealthStatus::from_cpu_utilization(cpu_utilization),
        }
    }

    /// Sample the host. Blocks for sysinfo's minimum CPU update interval,
    /// since utilisation is measured between two refreshes.
    pub fn sample() -> Self {
        let Ok(mut sys) = SYSTEM.lock() else {
            tracing::warn!("system sampler lock poisoned");
            return SystemHealth::from_readings(0, 0.0);
        };
        sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        SystemHealth::from_readings(sys.cpus().len(), sys.global_cpu_usage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_report() {
        let report = HealthReport::current();
        assert_eq!(report.status, "healthy");
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_status_threshold() {
        assert_eq!(HealthStatus::from_cpu_utilization(80.0), HealthStatus::Good);
        assert_eq!(HealthStatus::from_cpu_utilization(80.5), HealthStatus::Warning);
        assert_eq!(SystemHealth::from_readings(8, 95.0).status, HealthStatus::Warning);
    }

    #[test]
    fn test_sample_reports_cores() {
        let health = SystemHealth::sample();
        assert!(health.cpu_utilization >= 0.0);
    }
}
