//! Processor factories.

use harrier_component::{Factory, InvalidConfig, SignalType};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::yaml_value;

/// Batch processor: buffers telemetry and forwards it in batches.
pub struct BatchProcessorFactory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BatchConfig {
    /// Flush interval for incomplete batches.
    timeout_ms: u64,
    /// Batch size that triggers an immediate flush.
    send_batch_size: u64,
    /// Hard cap on batch size; 0 means uncapped.
    send_batch_max_size: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 200,
            send_batch_size: 8192,
            send_batch_max_size: 0,
        }
    }
}

impl Factory for BatchProcessorFactory {
    fn type_name(&self) -> &str {
        "batch"
    }

    fn default_config(&self) -> Value {
        yaml_value(&BatchConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: BatchConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if config.send_batch_size == 0 {
            return Err(InvalidConfig::new("send_batch_size must be positive"));
        }
        if config.send_batch_max_size != 0 && config.send_batch_max_size < config.send_batch_size {
            return Err(InvalidConfig::new(
                "send_batch_max_size must be >= send_batch_size",
            ));
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &SignalType::ALL
    }
}

/// Memory limiter: refuses data when the process nears its memory budget.
pub struct MemoryLimiterProcessorFactory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MemoryLimiterConfig {
    /// How often usage is checked.
    check_interval_ms: u64,
    /// Hard memory budget.
    limit_mib: u64,
    /// Headroom above which soft limiting starts.
    spike_limit_mib: u64,
}

impl Default for MemoryLimiterConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 1000,
            limit_mib: 512,
            spike_limit_mib: 128,
        }
    }
}

impl Factory for MemoryLimiterProcessorFactory {
    fn type_name(&self) -> &str {
        "memory_limiter"
    }

    fn default_config(&self) -> Value {
        yaml_value(&MemoryLimiterConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: MemoryLimiterConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if config.check_interval_ms == 0 {
            return Err(InvalidConfig::new("check_interval_ms must be positive"));
        }
        if config.limit_mib == 0 {
            return Err(InvalidConfig::new("limit_mib must be positive"));
        }
        if config.spike_limit_mib >= config.limit_mib {
            return Err(InvalidConfig::new("spike_limit_mib must be below limit_mib"));
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &SignalType::ALL
    }
}
