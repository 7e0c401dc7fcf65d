//! 统一可观测性模块
//!
//! 所有入口通过单一函数初始化日志，确保一致的字段命名和输出格式。

pub mod tracing;

use ::tracing::info;

use crate::config::ObservabilityConfig;
use crate::error::Result;

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use quiz_shared::{config::AppConfig, observability};
///
/// let config = AppConfig::load("quiz-catalog")?;
/// observability::init(&config.service_name, &config.observability)?;
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        service = %service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );

    Ok(())
}
