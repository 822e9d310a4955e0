use std::time::SystemTime;

pub type ModelId = String;

/// One row of the backend model listing, as fetched and before resolution.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RawEntity {
    pub name: ModelId,
    pub size_bytes: u64,
    /// Short content digest (12 hex chars, may be empty)
    pub digest: String,
    /// RFC3339 string as delivered by the backend (may be empty)
    pub modified_at: String,
    pub hints: Option<EntityHints>,
}

/// Descriptor fields the backend itself may declare for a model.
/// Present hints win over anything parsed out of the raw name.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct EntityHints {
    pub family: Option<String>,
    pub parameter_scale: Option<String>,
    pub quantization: Option<String>,
    pub format: Option<String>,
}

/// Stable view-model record for one model. Recomputed whenever the raw
/// listing changes; identity is `id`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModelDescriptor {
    pub id: ModelId,
    pub raw_name: String,
    pub digest: String,
    pub family: String,
    /// Parameter scale label, e.g. "7B" or "70B"
    pub parameter_scale: String,
    /// Quantization label, e.g. "Q4_K_M"
    pub quantization: String,
    pub format: String,
    pub size_bytes: u64,
    pub modified_at: String,
}

/// Raw gauge readings from the host telemetry probe.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResourceUsage {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub gpu_percent: f32,
    pub vram_used_bytes: u64,
}

/// A usage reading stamped with its capture time. Snapshots are not kept
/// historically; the only rollup is `PeakUsage`.
#[derive(Clone, Copy, Debug)]
pub struct ResourceSnapshot {
    pub usage: ResourceUsage,
    pub captured_at: SystemTime,
}

impl ResourceSnapshot {
    pub fn now(usage: ResourceUsage) -> Self {
        Self {
            usage,
            captured_at: SystemTime::now(),
        }
    }
}

/// Monotonic per-metric maxima over the process lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeakUsage {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub gpu_percent: f32,
    pub vram_used_bytes: u64,
}

impl PeakUsage {
    pub fn observe(&mut self, usage: &ResourceUsage) {
        self.cpu_percent = self.cpu_percent.max(usage.cpu_percent);
        self.ram_percent = self.ram_percent.max(usage.ram_percent);
        self.gpu_percent = self.gpu_percent.max(usage.gpu_percent);
        self.vram_used_bytes = self.vram_used_bytes.max(usage.vram_used_bytes);
    }
}

/// Per-model performance estimate derived from the listing and the most
/// recent host snapshot. No backend endpoint reports these directly.
#[derive(Clone, Debug, PartialEq)]
pub struct PerfSample {
    pub id: ModelId,
    pub throughput_tps: u32,
    pub latency_ms: u32,
    pub memory_bytes: u64,
    pub load_percent: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogLine {
    pub text: String,
    pub level: LogLevel,
    pub seen_at: SystemTime,
}

/// Human-readable byte size (GB/MB/KB, one decimal).
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Render a backend RFC3339 timestamp as "YYYY-MM-DD HH:MM:SS" without
/// parsing it into a date type. Sub-second digits and zone offsets are
/// dropped; anything that does not look like a timestamp passes through.
pub fn format_modified_at(raw: &str) -> String {
    let Some((date, rest)) = raw.split_once('T') else {
        return if raw.is_empty() { "unknown".to_string() } else { raw.to_string() };
    };
    let time: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ':')
        .collect();
    if date.len() == 10 && time.len() >= 8 {
        format!("{} {}", date, &time[..8])
    } else {
        raw.to_string()
    }
}
