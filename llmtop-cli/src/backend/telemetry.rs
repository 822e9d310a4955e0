//! Host telemetry probe

use sysinfo::System;
use tokio::sync::Mutex;

use llmtop_core::model::ResourceUsage;

/// Samples host gauges through `sysinfo`. CPU usage is measured between
/// consecutive refreshes, so the first reading after startup reports low
/// until the second poll lands.
pub struct SystemProbe {
    system: Mutex<System>,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new_all()),
        }
    }

    pub async fn sample(&self) -> ResourceUsage {
        let mut system = self.system.lock().await;
        system.refresh_cpu_all();
        system.refresh_memory();

        let cpu_percent = system.global_cpu_usage();
        let total = system.total_memory();
        let used = system.used_memory();
        let ram_percent = if total > 0 {
            used as f32 / total as f32 * 100.0
        } else {
            0.0
        };

        // The host probe exposes no GPU counters; those gauges read zero.
        ResourceUsage {
            cpu_percent,
            ram_percent,
            gpu_percent: 0.0,
            vram_used_bytes: 0,
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}
