//! NTA Status Tool
//!
//! Provides runtime status information about the NTA service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Status response
#[derive(Debug, Clone, Serialize)]
pub struct NtaStatus {
    pub build: BuildInfo,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub entity_source: String,
    /// External nutrition database, if one is attached
    pub nutrition_source: Option<String>,
    pub usda_configured: bool,
}

/// Which sources the analyzer was built with
#[derive(Debug, Clone)]
pub struct Readiness {
    pub entity_source: String,
    pub nutrition_source: Option<String>,
    pub usda_configured: bool,
}

/// Tracks service start time and readiness
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    readiness: Readiness,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(readiness: Readiness) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            readiness,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NtaStatus {
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NtaStatus {
            build: BuildInfo::current(),
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            entity_source: self.readiness.entity_source.clone(),
            nutrition_source: self.readiness.nutrition_source.clone(),
            usda_configured: self.readiness.usda_configured,
        }
    }
}
