//! Host CPU introspection
//!
//! Linux exposes the affinity mask in `/proc/self/status`; other platforms
//! only report the logical CPU count.

use crate::core::parallelism::{AffinityMask, CpuTopology};

/// Per-process status file carrying `Cpus_allowed`
#[cfg(target_os = "linux")]
const PROC_STATUS: &str = "/proc/self/status";

/// Topology of the machine this process runs on
#[derive(Debug, Clone, Copy, Default)]
pub struct HostTopology;

impl CpuTopology for HostTopology {
    #[cfg(target_os = "linux")]
    fn affinity_mask(&self) -> Option<AffinityMask> {
        match std::fs::read_to_string(PROC_STATUS) {
            Ok(status) => parse_cpus_allowed(&status),
            Err(e) => {
                tracing::debug!("Cannot read {PROC_STATUS}: {e}");
                None
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn affinity_mask(&self) -> Option<AffinityMask> {
        None
    }

    fn logical_cpu_count(&self) -> Option<usize> {
        Some(num_cpus::get()).filter(|&count| count > 0)
    }
}

/// Find the `Cpus_allowed:` entry of a process status file
pub fn parse_cpus_allowed(status: &str) -> Option<AffinityMask> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Cpus_allowed:"))
        .and_then(AffinityMask::parse)
}
