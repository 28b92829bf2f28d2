//! CPU time and resident memory of a running script.
//!
//! Readings come from `/proc`, so they are only available on Linux. A script
//! is sampled together with every live descendant (`jq`, `git`, `ccusage`),
//! and CPU time includes children the shell has already reaped.

use serde::Serialize;

/// Kernel clock ticks per second as exposed in `/proc/<pid>/stat`.
const CLOCK_TICKS_PER_SEC: u64 = 100;

/// Resource usage of one run, folded over all of its samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUsage {
    /// User plus system CPU time, in milliseconds
    pub cpu_time_ms: f64,
    /// Largest resident set seen across the process tree, in KiB
    pub peak_memory_kb: u64,
}

impl ResourceUsage {
    /// Fold a newer sample into this one.
    pub fn merge(self, sample: ResourceUsage) -> Self {
        Self {
            cpu_time_ms: self.cpu_time_ms.max(sample.cpu_time_ms),
            peak_memory_kb: self.peak_memory_kb.max(sample.peak_memory_kb),
        }
    }
}

/// Sample `pid` and its descendants. `None` once the process is gone or
/// when `/proc` is unavailable.
pub fn sample_process_tree(pid: u32) -> Option<ResourceUsage> {
    #[cfg(target_os = "linux")]
    {
        let mut ticks = 0;
        let mut rss_kb = 0;
        let mut pending = vec![pid];
        let mut root_seen = false;

        while let Some(current) = pending.pop() {
            let Some((proc_ticks, proc_rss)) = read_proc(current) else {
                continue;
            };
            root_seen |= current == pid;
            ticks += proc_ticks;
            rss_kb += proc_rss;
            pending.extend(read_children(current));
        }

        root_seen.then(|| ResourceUsage {
            cpu_time_ms: ticks as f64 * 1000.0 / CLOCK_TICKS_PER_SEC as f64,
            peak_memory_kb: rss_kb,
        })
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = pid;
        None
    }
}

#[cfg(target_os = "linux")]
fn read_proc(pid: u32) -> Option<(u64, u64)> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    let ticks = parse_cpu_ticks(&stat)?;
    // Zombies have no VmRSS line.
    let rss = std::fs::read_to_string(format!("/proc/{pid}/status"))
        .ok()
        .and_then(|status| parse_vm_rss_kb(&status))
        .unwrap_or(0);
    Some((ticks, rss))
}

#[cfg(target_os = "linux")]
fn read_children(pid: u32) -> Vec<u32> {
    std::fs::read_to_string(format!("/proc/{pid}/task/{pid}/children"))
        .map(|children| {
            children
                .split_whitespace()
                .filter_map(|c| c.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}

/// `VmRSS` in KiB from the contents of `/proc/<pid>/status`.
pub fn parse_vm_rss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse().ok())
}

/// `utime + stime + cutime + cstime` from the contents of `/proc/<pid>/stat`.
///
/// The command name may contain spaces and parentheses, so fields are counted
/// from the last `)`.
pub fn parse_cpu_ticks(stat: &str) -> Option<u64> {
    let (_, rest) = stat.rsplit_once(')')?;
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // rest starts at field 3 (state); utime is field 14.
    fields
        .get(11..15)?
        .iter()
        .map(|f| f.parse::<u64>().ok())
        .sum()
}
