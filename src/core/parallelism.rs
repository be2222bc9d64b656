//! Job count estimation
//!
//! Picks the `-j` value for make from the CPUs this process may actually
//! run on. Host introspection sits behind [`CpuTopology`] so the estimate
//! can be computed against canned values.

use crate::config::defaults::{EXTRA_JOBS, FALLBACK_JOB_COUNT};

/// CPU affinity bitmask, as printed by the kernel
///
/// The kernel prints the mask as comma-separated groups of up to eight hex
/// digits, most significant group first (`ffffffff,ffffffff`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityMask {
    words: Vec<u32>,
}

impl AffinityMask {
    /// Build a mask from 32-bit words, most significant first
    pub fn from_words(words: Vec<u32>) -> Self {
        Self { words }
    }

    /// Parse the textual mask, returning `None` if it is malformed
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let words = text
            .split(',')
            .map(|group| {
                if group.is_empty() || group.len() > 8 {
                    return None;
                }
                u32::from_str_radix(group, 16).ok()
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self { words })
    }

    /// Number of CPUs the mask allows
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Source of host CPU information
pub trait CpuTopology {
    /// CPUs this process is allowed to run on
    fn affinity_mask(&self) -> Option<AffinityMask>;

    /// Logical CPUs available to this process
    fn logical_cpu_count(&self) -> Option<usize>;
}

/// Estimate the number of parallel build jobs
///
/// Tries the affinity mask, then the logical CPU count, and finally settles
/// on [`FALLBACK_JOB_COUNT`]. One job beyond the CPU count keeps the CPUs
/// busy while other jobs wait on I/O.
pub fn estimate_job_count(topology: &dyn CpuTopology) -> usize {
    if let Some(mask) = topology.affinity_mask() {
        let allowed = mask.count();
        if allowed > 0 {
            tracing::debug!("Affinity mask allows {allowed} CPUs");
            return allowed + EXTRA_JOBS;
        }
    }

    match topology.logical_cpu_count() {
        Some(count) if count > 0 => {
            tracing::debug!("Host reports {count} logical CPUs");
            count + EXTRA_JOBS
        }
        _ => {
            tracing::warn!("Could not determine CPU count, using {FALLBACK_JOB_COUNT} jobs");
            FALLBACK_JOB_COUNT
        }
    }
}

/// Topology returning fixed values
#[derive(Debug, Clone, Default)]
pub struct FixedTopology {
    /// Mask returned by [`CpuTopology::affinity_mask`]
    pub mask: Option<AffinityMask>,
    /// Count returned by [`CpuTopology::logical_cpu_count`]
    pub cpus: Option<usize>,
}

impl CpuTopology for FixedTopology {
    fn affinity_mask(&self) -> Option<AffinityMask> {
        self.mask.clone()
    }

    fn logical_cpu_count(&self) -> Option<usize> {
        self.cpus
    }
}
