//! 日志初始化
//!
//! 基于 tracing-subscriber 组合环境过滤器和格式化输出层。

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;
use crate::error::{Result, SharedError};

/// 构建环境过滤器
///
/// RUST_LOG 优先，其次使用配置中的级别，都无效时回退到 info
pub fn build_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.log_level))
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 组装 subscriber，json 为真时输出结构化日志
fn build_subscriber<W>(
    filter: EnvFilter,
    json: bool,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let fmt_layer = if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer)
}

/// 初始化全局 subscriber
///
/// 重复初始化返回 Observability 错误，调用方可选择忽略
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    build_subscriber(build_env_filter(config), config.json_logs(), std::io::stdout)
        .try_init()
        .map_err(|e| SharedError::Observability(e.to_string()))
}
