use std::sync::Mutex;
use std::time::{Duration, Instant};
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone, Copy)]
pub struct ResourceSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

struct Sampler {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

/// Process resource sampler for one-shot `analyze` runs.
///
/// 無法取得 PID 時自動停用，不影響分析流程。
pub struct ResourceMonitor {
    sampler: Option<Mutex<Sampler>>,
    started: Instant,
}

impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        let sampler = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    Some(Mutex::new(Sampler {
                        system,
                        pid,
                        peak_memory_mb: 0,
                    }))
                }
                Err(e) => {
                    tracing::warn!("⚠️ Resource monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            sampler,
            started: Instant::now(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn snapshot(&self) -> Option<ResourceSnapshot> {
        let mut sampler = self.sampler.as_ref()?.lock().ok()?;
        sampler.system.refresh_all();

        let (cpu_usage, memory_mb) = {
            let process = sampler.system.process(sampler.pid)?;
            (process.cpu_usage(), process.memory() / 1024 / 1024)
        };
        sampler.peak_memory_mb = sampler.peak_memory_mb.max(memory_mb);

        Some(ResourceSnapshot {
            cpu_usage,
            memory_mb,
            peak_memory_mb: sampler.peak_memory_mb,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.snapshot() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb,
                stats.elapsed
            );
        }
    }

    pub fn log_summary(&self) {
        if let Some(stats) = self.snapshot() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed,
                stats.peak_memory_mb
            );
        }
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::disabled()
    }
}
