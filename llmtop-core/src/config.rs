use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolver::DescriptorResolver;
use crate::retry::RetryPolicy;
use crate::source::SourceKind;

/// Polling cadence configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// Base refresh interval in seconds; every per-source interval is
    /// derived from this one knob
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: f64,
}

fn default_refresh_interval() -> f64 {
    2.0
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
        }
    }
}

/// Inference backend endpoint
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:11434/api".into()
}
fn default_backend_timeout() -> u64 {
    5
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

/// Fallbacks for descriptor fields the name and hints leave open
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default = "default_parameter_scale")]
    pub default_parameter_scale: String,

    #[serde(default = "default_quantization")]
    pub default_quantization: String,
}

fn default_parameter_scale() -> String {
    "7B".into()
}
fn default_quantization() -> String {
    "Q4_K_M".into()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_parameter_scale: default_parameter_scale(),
            default_quantization: default_quantization(),
        }
    }
}

/// Retry and failure-notification policy
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Total attempts per guarded fetch, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before the second attempt; doubles per failure
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Consecutive guarded-fetch failures before the one throttled
    /// notification goes out
    #[serde(default = "default_notify_after")]
    pub notify_after_failures: u32,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_notify_after() -> u32 {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            notify_after_failures: default_notify_after(),
        }
    }
}

/// Log retention
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogsConfig {
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

fn default_history_cap() -> usize {
    1000
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
        }
    }
}

/// Root configuration file structure
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logs: LogsConfig,
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    NotFound { searched: Vec<PathBuf> },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML parse error: {}", e),
            Self::NotFound { searched } => {
                write!(f, "no config file found, searched: {:?}", searched)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

impl MonitorConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig = serde_yaml::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Load configuration from a string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: MonitorConfig = serde_yaml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Search for a config file in standard locations
    pub fn discover(start_dir: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let names = ["llmtop.yaml", "llmtop.yml", ".llmtop.yaml", ".llmtop.yml"];
        let mut searched = Vec::new();

        // Check environment variable first
        if let Ok(env_path) = std::env::var("LLMTOP_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Ok((path.clone(), Self::load(&path)?));
            }
            searched.push(path);
        }

        // Search current directory and parents
        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &names {
                let path = current.join(name);
                if path.exists() {
                    return Ok((path.clone(), Self::load(&path)?));
                }
                searched.push(path);
            }
            dir = current.parent();
        }

        Err(ConfigError::NotFound { searched })
    }

    /// The startup path: configuration problems degrade to defaults, they
    /// never abort. An explicit path that fails to load is worth a warning;
    /// simply having no config file anywhere is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return match Self::load(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to load config {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            };
        }

        let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match Self::discover(&start) {
            Ok((path, config)) => {
                tracing::debug!("loaded config from {}", path.display());
                config
            }
            Err(ConfigError::NotFound { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!("failed to load config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Replace invalid values with their defaults, field by field. A bad
    /// refresh interval must not cost the operator the rest of the file.
    fn sanitized(mut self) -> Self {
        if !self.monitoring.refresh_interval.is_finite() || self.monitoring.refresh_interval <= 0.0
        {
            tracing::warn!(
                "invalid monitoring.refresh_interval {:?}, using {}",
                self.monitoring.refresh_interval,
                default_refresh_interval()
            );
            self.monitoring.refresh_interval = default_refresh_interval();
        }
        if self.backend.timeout_secs == 0 {
            tracing::warn!("backend.timeout_secs must be at least 1, using {}", default_backend_timeout());
            self.backend.timeout_secs = default_backend_timeout();
        }
        if self.retry.max_attempts == 0 {
            tracing::warn!("retry.max_attempts must be at least 1, using {}", default_max_attempts());
            self.retry.max_attempts = default_max_attempts();
        }
        if self.retry.notify_after_failures == 0 {
            tracing::warn!(
                "retry.notify_after_failures must be at least 1, using {}",
                default_notify_after()
            );
            self.retry.notify_after_failures = default_notify_after();
        }
        if self.logs.history_cap == 0 {
            tracing::warn!("logs.history_cap must be at least 1, using {}", default_history_cap());
            self.logs.history_cap = default_history_cap();
        }
        self
    }

    pub fn intervals(&self) -> SourceIntervals {
        SourceIntervals::from_base(self.monitoring.refresh_interval)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
        }
    }

    pub fn descriptor_resolver(&self) -> DescriptorResolver {
        DescriptorResolver::new(
            self.resolver.default_parameter_scale.clone(),
            self.resolver.default_quantization.clone(),
        )
    }
}

/// Per-source polling intervals, all derived from the base interval. At the
/// default base of 2 s: system 2 s, models 5 s, performance 3 s, details and
/// logs 1 s.
#[derive(Clone, Copy, Debug)]
pub struct SourceIntervals {
    pub system: Duration,
    pub models: Duration,
    pub performance: Duration,
    pub details: Duration,
    pub logs: Duration,
}

impl SourceIntervals {
    pub fn from_base(base_secs: f64) -> Self {
        let base = if base_secs.is_finite() && base_secs > 0.0 {
            base_secs
        } else {
            default_refresh_interval()
        };
        Self {
            system: Duration::from_secs_f64(base),
            models: Duration::from_secs_f64(base * 2.5),
            performance: Duration::from_secs_f64(base * 1.5),
            details: Duration::from_secs_f64(base / 2.0),
            logs: Duration::from_secs_f64(base / 2.0),
        }
    }

    pub fn for_kind(&self, kind: &SourceKind) -> Duration {
        match kind {
            SourceKind::Models => self.models,
            SourceKind::System => self.system,
            SourceKind::Performance => self.performance,
            SourceKind::Details(_) => self.details,
            SourceKind::Logs(_) => self.logs,
        }
    }
}

impl Default for SourceIntervals {
    fn default() -> Self {
        Self::from_base(default_refresh_interval())
    }
}
